//! The weblog-client executable supports the following command line arguments:
//!
//! - `weblog-client save <FILE> [--addr IP-PORT]` stream the articles contained in a
//!   text file to the server
//! - `weblog-client list [--addr IP-PORT]` list the id and title of every stored
//!   article
//! - `weblog-client get <ARTICLE_ID> [--addr IP-PORT]` fetch a single article by id
//! - `weblog-client update <ARTICLE_ID> <TITLE> <CONTENT> [--addr IP-PORT]`
//!   overwrite the title and content of an article
//! - `weblog-client rm <ARTICLE_ID> [--addr IP-PORT]` remove an article
//!
//! `--addr` defaults to `127.0.0.1:50051`

use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{crate_version, App, Arg, ArgMatches, SubCommand};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;
use weblog::{blocks_from_text, Result, WeblogClient, WeblogError};

const DEFAULT_ADDRESS: &str = "127.0.0.1:50051";

/// the client operation parsed from the command line
#[derive(Debug)]
enum Command {
    Save { file: PathBuf },
    List,
    Get { article_id: String },
    Update {
        article_id: String,
        title: String,
        content: String,
    },
    Remove { article_id: String },
}

/// [`Opt`] holds parsed and validated options from the command line
#[derive(Debug)]
struct Opt {
    addr: SocketAddr,
    cmd: Command,
}

impl Opt {
    /// validates the `addr` parameter and pairs it with the requested command
    /// # Errors
    /// returns [`WeblogError::Parsing`] if `addr` is not a valid socket address
    fn build(addr: &str, cmd: Command) -> Result<Opt> {
        let addr: SocketAddr = addr.parse().map_err(|_| {
            WeblogError::Parsing(format!("could not parse {} into an IP addess and port", &addr))
        })?;
        Ok(Opt { addr, cmd })
    }
}

fn main() -> Result<()> {
    subscriber_config();

    let matches = App::new("weblog-client")
        .version(crate_version!())
        .author("strohs <strohs1@gmail.com>")
        .about("a command line client for the weblog article server")
        .arg(
            Arg::with_name("addr")
                .long("addr")
                .value_name("IP:PORT")
                .help("the IP:PORT of the weblog server")
                .default_value(DEFAULT_ADDRESS),
        )
        .subcommand(
            SubCommand::with_name("save")
                .about("streams the articles contained in a text file to the server")
                .arg(
                    Arg::with_name("FILE")
                        .help("path of a text file holding articles separated by blank lines")
                        .required(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("list").about("lists the id and title of every stored article"),
        )
        .subcommand(
            SubCommand::with_name("get")
                .about("fetches a single article by its id")
                .arg(Arg::with_name("ARTICLE_ID").help("the article id").required(true)),
        )
        .subcommand(
            SubCommand::with_name("update")
                .about("overwrites the title and content of an article")
                .arg(Arg::with_name("ARTICLE_ID").help("the article id").required(true))
                .arg(Arg::with_name("TITLE").help("the replacement title").required(true))
                .arg(
                    Arg::with_name("CONTENT")
                        .help("the replacement content")
                        .required(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("rm")
                .about("removes an article by its id")
                .arg(Arg::with_name("ARTICLE_ID").help("the article id").required(true)),
        )
        .get_matches();

    match parse_options(matches) {
        Ok(opt) => run(opt),
        Err(e) => Err(e),
    }
}

/// builds an [`Opt`] out of the command line matches
fn parse_options(matches: ArgMatches) -> Result<Opt> {
    let addr = matches.value_of("addr").unwrap();

    match matches.subcommand() {
        ("save", Some(args)) => {
            let file = args.value_of("FILE").map(PathBuf::from).unwrap();
            Opt::build(addr, Command::Save { file })
        }
        ("list", _) => Opt::build(addr, Command::List),
        ("get", Some(args)) => {
            let article_id = args.value_of("ARTICLE_ID").map(String::from).unwrap();
            Opt::build(addr, Command::Get { article_id })
        }
        ("update", Some(args)) => {
            let article_id = args.value_of("ARTICLE_ID").map(String::from).unwrap();
            let title = args.value_of("TITLE").map(String::from).unwrap();
            let content = args.value_of("CONTENT").map(String::from).unwrap();
            Opt::build(
                addr,
                Command::Update {
                    article_id,
                    title,
                    content,
                },
            )
        }
        ("rm", Some(args)) => {
            let article_id = args.value_of("ARTICLE_ID").map(String::from).unwrap();
            Opt::build(addr, Command::Remove { article_id })
        }
        _ => panic!("unknown command received"),
    }
}

/// connects to the server and executes the requested command, printing the server's
/// answer on stdout
fn run(opt: Opt) -> Result<()> {
    debug!("connecting to {}", opt.addr);
    let mut client = WeblogClient::connect(opt.addr)?;

    match opt.cmd {
        Command::Save { file } => {
            let text = fs::read_to_string(&file).map_err(WeblogError::Storage)?;
            let blocks = blocks_from_text(&text);
            let result = client.save_all_articles(blocks)?;
            println!("{}", result);
        }
        Command::List => {
            let listing = client.get_all_articles()?;
            println!("{}", listing);
        }
        Command::Get { article_id } => {
            let article = client.get_specified_article(article_id)?;
            println!("articleID: {}", article.article_id);
            println!("title: {}", article.title);
            println!("content: {}", article.content);
        }
        Command::Update {
            article_id,
            title,
            content,
        } => {
            let result = client.update_specified_article(article_id, title, content)?;
            println!("{}", result);
        }
        Command::Remove { article_id } => {
            let result = client.remove_specified_article(article_id)?;
            println!("{}", result);
        }
    }
    Ok(())
}

/// configures a tracing subscriber that will log to STDERR
fn subscriber_config() {
    let subscriber = FmtSubscriber::builder()
        // only warn and error events on the client
        .with_max_level(Level::WARN)
        // log to stderr instrad of stdout
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting tracing default subscriber failed");
}
