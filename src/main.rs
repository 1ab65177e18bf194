use argyle_web::config::{self, SiteConfig};
use argyle_web::contact::ResendMailer;
use argyle_web::content::open_store;
use argyle_web::output;
use argyle_web::pages::Site;
use argyle_web::serve::{self, App};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "argyle-web")]
#[command(about = "Municipal website server backed by a headless content store")]
#[command(long_about = "\
Municipal website server backed by a headless content store

Pages are documents in the content store. Each page carries an ordered list
of content slots (hero, gallery, textBlock, quickLinksGrid, municipalGroup,
googleMap); each slot renders through its own block. Unknown slot kinds
render a visible diagnostic placeholder instead of failing the page.

Routes:

  /                         home page (site.home_slug)
  /business                 business page + directory (?category=...)
  /business/<slug>          business detail
  /organizations/<slug>     organization page
  /contact                  contact page and form
  /api/contact              POST: contact form endpoint
  /<slug>                   any other page

Environment:
  RESEND_API_KEY, RESEND_FROM, RESEND_TO   contact form email delivery
  PORT                                     overrides server.port
  RUST_LOG                                 log level (default: info)

Run 'argyle-web gen-config' to generate a documented site.toml.")]
#[command(version)]
struct Cli {
    /// Site configuration file (missing file means stock defaults)
    #[arg(long, default_value = "site.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Fetch one page and print its full HTML document
    Render {
        /// Page slug
        slug: String,
        /// Render in home-page mode
        #[arg(long)]
        home: bool,
    },
    /// Fetch one page and print an inventory of its content slots
    Check {
        /// Page slug
        slug: String,
    },
    /// Print a stock site.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => {
            let config = load(&cli.config)?;
            let server = config.server.clone();
            if config.mail.api_key.is_none() {
                log::warn!("RESEND_API_KEY is not set; contact form submissions will fail");
            }
            let mailer = ResendMailer::new(&config.mail)?;
            let store = open_store(&config.content)?;
            let app = App::new(Site::new(config, store), Box::new(mailer));
            serve::serve(app, &server)?;
        }
        Command::Render { slug, home } => {
            let config = load(&cli.config)?;
            let store = open_store(&config.content)?;
            let site = Site::new(config, store);
            let now = Utc::now();
            let doc = site.render_page(&slug, home, now);
            if doc.status != 200 {
                log::warn!("page {slug:?} rendered with status {}", doc.status);
            }
            println!("{}", doc.markup.into_string());
        }
        Command::Check { slug } => {
            let config = load(&cli.config)?;
            let store = open_store(&config.content)?;
            match store.page_by_slug(&slug)? {
                Some(page) => output::print_page_inventory(&page),
                None => return Err(format!("no page with slug {slug:?}").into()),
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn load(path: &std::path::Path) -> Result<SiteConfig, config::ConfigError> {
    let config = config::load_config(path, |key| std::env::var(key).ok())?;
    log::debug!("config loaded from {}", path.display());
    Ok(config)
}
