fn main() {
    ckedit::cli::run();
}
