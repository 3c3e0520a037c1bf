use std::io::Write;
use env_logger::Builder;
use log::LevelFilter;

/// Timestamped level-tagged log lines on stderr, so that stdout only carries results.
pub fn init() {
    let _ = Builder::new()
        .format(|buf, record| {
            writeln!(buf,
                "{} [{}] - {}",
                buf.timestamp_seconds(),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        .try_init();
}
