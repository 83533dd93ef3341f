//! this binary starts the weblog server
//! to see the list of options, type: `weblog-server --help`

use std::path::Path;
use std::process::exit;

use clap::{crate_version, App, Arg};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use weblog::{
    AccessLog, ArticleService, ErrorLog, JsonArticleStore, Result, ServerConfig,
    SharedQueueThreadPool, ThreadPool, WeblogServer,
};

// fixed paths, relative to the server's working directory
const ARTICLE_FILE_PATH: &str = "conf/saveArticles.json";
const ACCESS_LOG_PATH: &str = "logger/access.log";
const ERROR_LOG_PATH: &str = "logger/error.log";

const DEFAULT_CONFIG_PATH: &str = "conf/conf.json";

// number of worker threads serving connections
const POOL_SIZE: u32 = 4;

fn main() {
    // set up a tracing subscriber to log to STDERR
    subscriber_config();

    // parse command line args
    let matches = App::new("weblog-server")
        .version(crate_version!())
        .author("strohs <strohs1@gmail.com>")
        .about("a multi-threaded article management server backed by a json file")
        .arg(
            Arg::with_name("conf")
                .long("conf")
                .value_name("FILE")
                .help("sets the path of the json configuration file")
                .default_value(DEFAULT_CONFIG_PATH),
        )
        .get_matches();

    let conf_path = matches.value_of("conf").unwrap();

    // start the server
    if let Err(e) = run(Path::new(conf_path)) {
        eprintln!("{:?}", e);
        exit(1);
    }
}

fn run(conf_path: &Path) -> Result<()> {
    info!("weblog-server {}", env!("CARGO_PKG_VERSION"));

    // the sinks open first so that a configuration failure still lands in the
    // error log
    let access_log = AccessLog::open(Path::new(ACCESS_LOG_PATH))?;
    let error_log = ErrorLog::open(Path::new(ERROR_LOG_PATH))?;

    let config = match ServerConfig::load(conf_path) {
        Ok(config) => config,
        Err(e) => {
            error_log.fatal_startup("Failed to read config file", &e);
            return Err(e);
        }
    };
    let addr = config.listen_addr()?;
    info!("Listening on {}", addr);

    let store = JsonArticleStore::open(ARTICLE_FILE_PATH)?;
    let service = ArticleService::new(store, access_log, error_log.clone());
    let pool = SharedQueueThreadPool::new(POOL_SIZE)?;
    let server = WeblogServer::new(service, pool);

    if let Err(e) = server.run(addr) {
        error_log.fatal_startup("Failed to listen", &e);
        return Err(e);
    }
    Ok(())
}

/// configures a tracing subscriber that will log to STDERR
fn subscriber_config() {
    let subscriber = FmtSubscriber::builder()
        // all spans/events with a level higher than TRACE (e.g, debug, info, warn, etc.)
        // will be written to stdout.
        .with_max_level(Level::TRACE)
        // log to stderr instrad of stdout
        .with_writer(std::io::stderr)
        // completes the builder.
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting tracing default subscriber failed");
}
