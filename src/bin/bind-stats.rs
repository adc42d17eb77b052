use std::env;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use getopts::{Matches, Options};
use tracing_subscriber::EnvFilter;

use bind_stats::stats::errors::CacheError;
use bind_stats::stats::{CollectorConfig, StatsCollector, StatsError};

fn print_usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {} [options]", program);
    print!("{}", opts.usage(&brief));
}

fn build_options() -> Options {
    let mut opts = Options::new();
    opts.optflag("h", "help", "print this help menu");
    opts.optopt(
        "H",
        "host",
        "Statistics channel host (default: localhost, env: BIND_STATS_HOST)",
        "HOST",
    );
    opts.optopt(
        "p",
        "port",
        "Statistics channel port (default: 8053, env: BIND_STATS_PORT)",
        "PORT",
    );
    opts.optopt(
        "c",
        "cache-file",
        "Cache file path (default: /tmp/telegraf_bind.cache, env: BIND_STATS_CACHE_FILE)",
        "PATH",
    );
    opts.optopt(
        "l",
        "cache-lifetime",
        "Seconds a cached result stays fresh (default: 60, env: BIND_STATS_CACHE_LIFETIME)",
        "SECONDS",
    );
    opts.optopt(
        "t",
        "timeout",
        "Request timeout in seconds (default: 5, env: BIND_STATS_TIMEOUT)",
        "SECONDS",
    );
    opts.optflag("r", "refresh", "Always query the server, ignoring a fresh cache");
    opts.optflag("v", "verbose", "Log debug output to stderr");
    opts
}

/// Flag value, falling back to the environment
fn setting(matches: &Matches, opt: &str, var: &str) -> Option<String> {
    matches.opt_str(opt).or_else(|| env::var(var).ok())
}

fn parse_number<T: std::str::FromStr>(value: &str, name: &str) -> Result<T, String> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| format!("Invalid value for {}: '{}'", name, value))
}

fn build_config(matches: &Matches) -> Result<CollectorConfig, String> {
    let mut config = CollectorConfig::default();

    if let Some(host) = setting(matches, "H", "BIND_STATS_HOST") {
        config.host = host;
    }
    if let Some(port) = setting(matches, "p", "BIND_STATS_PORT") {
        config.port = parse_number(&port, "port")?;
    }
    if let Some(path) = setting(matches, "c", "BIND_STATS_CACHE_FILE") {
        config.cache_file = PathBuf::from(path);
    }
    if let Some(secs) = setting(matches, "l", "BIND_STATS_CACHE_LIFETIME") {
        config.cache_lifetime = Duration::from_secs(parse_number(&secs, "cache-lifetime")?);
    }
    if let Some(secs) = setting(matches, "t", "BIND_STATS_TIMEOUT") {
        config.timeout = Duration::from_secs(parse_number(&secs, "timeout")?);
    }

    Ok(config)
}

/// Logs go to stderr; stdout carries nothing but the metrics
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(config: &CollectorConfig, refresh: bool) -> Result<String, StatsError> {
    let collector = StatsCollector::with_http(config)?.force_refresh(refresh);
    let collection = collector.collect()?;

    log::debug!("Metrics source: {:?}", collection.source);

    let json = serde_json::to_string(&collection.metrics).map_err(CacheError::from)?;
    Ok(json)
}

/// Main entry point for the statistics collector
fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args
        .first()
        .cloned()
        .unwrap_or_else(|| "bind-stats".to_string());

    let opts = build_options();
    let opt_matches = match opts.parse(args.iter().skip(1)) {
        Ok(m) => m,
        Err(f) => {
            eprintln!("{}", f);
            eprintln!("Try '{} --help' for more information.", program);
            process::exit(1);
        }
    };

    if opt_matches.opt_present("h") {
        print_usage(&program, &opts);
        return;
    }

    init_logging(opt_matches.opt_present("v"));

    let config = match build_config(&opt_matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    log::debug!(
        "Collecting from {} (cache {}, lifetime {}s)",
        config.status_url(),
        config.cache_file.display(),
        config.cache_lifetime.as_secs()
    );

    match run(&config, opt_matches.opt_present("r")) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::debug!("Collection failed: {:?}", e);
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}
