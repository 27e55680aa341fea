mod app;
mod renderer;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tabletop_core::model::{MenuData, OrderState, Page, TableRoute};

/// Route used when no `--table` path is given on the command line.
const DEMO_TABLE: &str = "/demo/table/1";

fn init_logging() -> Result<()> {
    // Logs go to a file; writing to the terminal would corrupt the UI.
    let Some(path) = std::env::var_os("TABLETOP_LOG") else {
        return Ok(());
    };
    let file = std::fs::File::create(&path)
        .with_context(|| format!("cannot create log file {}", PathBuf::from(&path).display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Command-line options: an optional menu file and the QR route to open.
#[derive(Debug, PartialEq, Eq)]
struct Args {
    menu: Option<PathBuf>,
    route: String,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut menu = None;
    let mut route = None;
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--table" => {
                let path = args.next().context("--table needs a path like /store/table/N")?;
                route = Some(path);
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ if menu.is_none() => menu = Some(PathBuf::from(&arg)),
            _ => bail!("unexpected argument {arg}"),
        }
    }
    Ok(Args {
        menu,
        route: route.unwrap_or_else(|| DEMO_TABLE.to_owned()),
    })
}

fn main() -> Result<()> {
    init_logging()?;

    let argv: Vec<String> = std::env::args().skip(1).collect();
    if argv.iter().any(|a| a == "-h" || a == "--help") {
        eprintln!("Usage: tabletop [menu.json] [--table /store/table/N]");
        std::process::exit(1);
    }
    let args = parse_args(argv)?;

    let menu = match &args.menu {
        Some(path) => {
            let data = std::fs::read(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            MenuData::from_json(&data)?
        }
        None => MenuData::bundled()?,
    };
    let (table, page) = TableRoute::parse(&args.route)?;
    tracing::info!(store = %table.store_id, table = %table.table_id, "opening table");

    let state = OrderState::new(table, menu);
    let show_cart = matches!(page, Page::Cart | Page::Checkout);
    let focus = match page {
        Page::MenuItem(item) => Some(item),
        _ => None,
    };
    app::run(state, focus.as_deref(), show_cart)
}
