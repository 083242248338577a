use log::{error, info};
use std::error::Error;
use std::path::Path;
use std::process::ExitCode;
use weather_etl::{load_settings, run, EtlError, TABLE_NAME};

const ENV_FILE: &str = ".env";

/// Formats an error followed by its chain of sources.
fn report(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    message
}

async fn execute() -> Result<(), EtlError> {
    let settings = load_settings(Some(Path::new(ENV_FILE)))?;
    info!(
        "Running for {} cities, past_days={}, forecast_days={}, timezone={}",
        settings.cities.len(),
        settings.past_days,
        settings.forecast_days,
        settings.timezone
    );

    let summary = run(&settings).await?;
    info!(
        "Pipeline finished: {} hourly and {} daily rows in {}",
        summary.hourly_rows,
        summary.daily_rows,
        settings.output_dir.display()
    );
    if settings.db_uri.is_some() {
        info!("Table '{}' replaced", TABLE_NAME);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match execute().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = report(&e);
            error!("Pipeline failed: {}", message);
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}
