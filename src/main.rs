use std::path::PathBuf;

use anyhow::Context;
use log::debug;
use structopt::StructOpt;

use baedeker::{Config, Crawler, Language, StopWords, TitleList, WikiApi};

#[derive(Debug, StructOpt)]
#[structopt(name = "baedeker", about = "Wikivoyage text corpus builder.")]
struct App {
    #[structopt(name = "langcode", help = "Wikivoyage language prefix, e.g. en")]
    edition: String,
    #[structopt(
        long = "stoplist",
        short = "s",
        help = "Stopword vocabulary for the content classifier, e.g. English. \
                Without one the classifier runs language agnostic."
    )]
    stoplist: Option<Language>,
    #[structopt(
        long = "dir",
        short = "d",
        help = "Directory for the corpus, cache and log files.",
        parse(from_os_str)
    )]
    dir: Option<PathBuf>,
}

impl App {
    async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::builder(&self.edition);
        if let Some(dir) = self.dir {
            config = config.dir(dir);
        }
        let config = config.build();

        let stopwords = match self.stoplist {
            Some(language) => Some(StopWords::read_language_stopwords(language)?),
            None => None,
        };

        let client = config.client().context("failed to build the http client")?;
        let titles = TitleList::download(&client, config.edition())
            .await
            .with_context(|| format!("failed to fetch the {} title list", config.edition()))?;

        let api = WikiApi::with_client(client, &config)?;
        let mut crawler = Crawler::new(config, api, stopwords)
            .context("failed to open the corpus, cache and log files")?;

        let counters = crawler.run(&titles).await?;
        debug_assert_eq!(counters.total(), titles.len());
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let app = App::from_args();
    debug!("cli args\n{:#?}", app);
    app.run().await
}
