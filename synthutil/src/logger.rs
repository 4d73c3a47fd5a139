pub struct Logger;

impl Logger {
    /// Intercept messages using the `log` crate and print them to STDOUT.
    pub fn setup() {
        log::set_boxed_logger(Box::new(Logger)).unwrap();
        log::set_max_level(log::LevelFilter::Info);
    }
}

impl log::Log for Logger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let target = if !record.target().is_empty() {
            record.target()
        } else {
            record.module_path().unwrap_or_default()
        };
        println!("[{}] {}: {}", record.level(), target, record.args());
    }

    fn flush(&self) {}
}
