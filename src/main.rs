fn main() {
    pushpull::viewport::run();
}
