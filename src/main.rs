fn main() {
    calibre_portable::app::cli::run();
}
