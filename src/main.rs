fn main() {
    if let Err(err) = booking_report::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
