fn main() {
    if let Err(e) = idlemover_lib::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
