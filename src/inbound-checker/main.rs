#![warn(clippy::all)]
#![warn(rust_2018_idioms)]

use anyhow::Error;

/// Checks inbound dependencies against a whitelist and the license data
/// harvested by clearlydefined.io
#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Opts {}

fn setup_logger(level: log::LevelFilter) -> Result<(), fern::InitError> {
    use log::Level::*;
    use nu_ansi_term::Color::*;

    let time_format = time::macros::format_description!("[hour]:[minute]:[second]");

    fern::Dispatch::new()
        .level(log::LevelFilter::Warn)
        .level_for("inbound_checker", level)
        .format(move |out, message, record| {
            let now = time::OffsetDateTime::now_utc();

            out.finish(format_args!(
                "{date} [{level}] {message}\x1B[0m",
                date = now
                    .format(time_format)
                    .unwrap_or_else(|_| now.unix_timestamp().to_string()),
                level = match record.level() {
                    Error => Red.paint("ERROR"),
                    Warn => Yellow.paint("WARN"),
                    Info => Green.paint("INFO"),
                    Debug => Blue.paint("DEBUG"),
                    Trace => Purple.paint("TRACE"),
                },
            ));
        })
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

fn real_main() -> Result<(), Error> {
    let _opts = <Opts as clap::Parser>::parse();

    setup_logger(log::LevelFilter::Warn)?;

    println!("inbound-checker does not have a command line interface yet.");
    println!("Use the inbound_checker library to check dependencies.");

    Ok(())
}

fn main() {
    match real_main() {
        Ok(_) => {}
        Err(e) => {
            log::error!("{e:#}");
            std::process::exit(1);
        }
    }
}
