use std::{fmt::Write, sync::Arc};

use fanlog::{LevelMask, logger_config};

fn main() {
    // every thread shares one logger writing to stdout and a file
    let logger = Arc::new(
        logger_config()
            .with_name("bridge")
            .with_filter(LevelMask::INFO | LevelMask::WARN | LevelMask::ERR)
            .with_log_file("/tmp/fanlog_threads.log")
            .unwrap()
            .build(),
    );
    logger.info("All systems initialized");
    let handles: Vec<_> = (0..5)
        .map(|i| {
            let logger = Arc::clone(&logger);
            std::thread::spawn(move || {
                let mut composer = logger.request(LevelMask::WARN);
                write!(composer, "deck {i}: ").unwrap();
                write!(composer, "phasers damaged").unwrap();
                // FREQ is not in the filter
                logger.freq(format_args!("deck {i} heartbeat"));
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    logger.err("Failed to boot phasers");
    logger.flush().unwrap();
    println!(
        "last line of /tmp/fanlog_threads.log is:\n\t{}",
        std::fs::read_to_string("/tmp/fanlog_threads.log")
            .unwrap()
            .lines()
            .last()
            .unwrap()
    );
}
