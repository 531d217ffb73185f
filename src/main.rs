fn main() {
    poker_equity::cli::run();
}
