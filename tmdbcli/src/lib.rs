pub use crate::app::TmdbCliApp;
pub use crate::args::Args;

mod args {
    use anyhow::Result;
    use clap::Parser;
    use std::path::PathBuf;
    use tmdb_core::{Config, Settings};

    /// Command-line arguments accepted by the `tmdbcli` binary.
    #[derive(Parser, Debug)]
    #[command(
        name = "tmdbcli",
        version,
        about = "Search TMDb, list image addresses and browse downloaded pictures"
    )]
    pub struct Args {
        #[arg(short, long, help = "Movie title to search for (default: Predator)")]
        pub query: Option<String>,
        #[arg(
            long,
            env = "TMDB_API_KEY",
            hide_env_values = true,
            help = "TMDb v3 API key (default: the one in settings.json)"
        )]
        pub api_key: Option<String>,
        #[arg(short, long, help = "Interface language, English or French")]
        pub language: Option<String>,
        #[arg(short = 'n', long, help = "How many search results to print")]
        pub results: Option<usize>,
        #[arg(long, help = "Movie whose images are listed (default: 76338)")]
        pub movie_id: Option<i64>,
        #[arg(long, value_name = "PATH", help = "Keep settings and cached configuration here")]
        pub data_dir: Option<PathBuf>,
        #[arg(
            long,
            value_name = "PATH",
            help = "Write downloaded pictures here (default: current directory)"
        )]
        pub download_dir: Option<PathBuf>,
        #[arg(long, help = "Run one search and exit instead of showing the menu")]
        pub once: bool,
    }

    impl Args {
        /// File locations and settings for this run, flags layered over `settings.json`.
        pub fn load(&self) -> Result<(Config, Settings)> {
            let mut config = match &self.data_dir {
                Some(dir) => Config::in_dir(dir)?,
                None => Config::new()?,
            };
            if let Some(dir) = &self.download_dir {
                config = config.with_download_dir(dir.clone());
            }

            let mut settings = Settings::load(&config.settings_file);
            self.apply(&mut settings);
            Ok((config, settings))
        }

        pub fn apply(&self, settings: &mut Settings) {
            if let Some(language) = &self.language {
                settings.last_language = language.clone();
            }
            if let Some(results) = self.results {
                settings.results_shown = results;
            }
            if let Some(movie_id) = self.movie_id {
                settings.demo_movie_id = movie_id;
            }
        }

        /// The flag or environment wins over the stored key.
        pub fn api_key<'a>(&'a self, settings: &'a Settings) -> &'a str {
            self.api_key.as_deref().unwrap_or(&settings.api_key)
        }
    }
}

mod app {
    use anyhow::Result;
    use std::io::{self, BufRead, Write};
    use tmdb_core::{MovieDb, MovieSession};

    pub struct TmdbCliApp<C: MovieDb> {
        session: MovieSession<C>,
    }

    impl<C: MovieDb> TmdbCliApp<C> {
        pub fn new(session: MovieSession<C>) -> Self {
            Self { session }
        }

        pub fn session(&self) -> &MovieSession<C> {
            &self.session
        }

        /// Runs the search given on the command line, if any. `Ok(false)` means
        /// the run ends here instead of showing the menu.
        pub fn start<W: Write>(
            &mut self,
            query: Option<&str>,
            once: bool,
            out: &mut W,
        ) -> Result<bool> {
            if once {
                write!(out, "{}", self.session.get_movie(query.unwrap_or_default())?)?;
                return Ok(false);
            }
            if let Some(query) = query {
                write!(out, "{}", self.session.get_movie(query)?)?;
            }
            writeln!(out, "{} started successfully!", self.session.title())?;
            Ok(true)
        }

        fn picture_name(&self) -> String {
            self.session
                .browse()
                .current()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "(no picture)".to_string())
        }

        pub fn render_menu(&self) -> String {
            let browse = self.session.browse();
            let marker = |enabled: bool| if enabled { "" } else { " [-]" };
            let other_language = match self.session.language().other() {
                tmdb_core::Language::English => "MenuLanguageEnglish",
                tmdb_core::Language::French => "MenuLanguageFrench",
            };

            let mut menu = format!("\n=== {} ===\n", self.session.title());
            menu.push_str(&format!(
                "{}: {} | Pictures: {} | Showing: {}\n\n",
                self.session.translate("MenuLanguage"),
                self.session.language(),
                browse.len(),
                self.picture_name()
            ));
            menu.push_str(&format!("1. {}\n", self.session.translate("ButtonGetMovie")));
            menu.push_str(&format!(
                "2. {}{}\n",
                self.session.translate("ButtonNextPicture"),
                marker(browse.can_next())
            ));
            menu.push_str(&format!(
                "3. {}{}\n",
                self.session.translate("ButtonPreviousPicture"),
                marker(browse.can_previous())
            ));
            menu.push_str(&format!(
                "4. {} -> {}\n",
                self.session.translate("MenuLanguage"),
                self.session.translate(other_language)
            ));
            menu.push_str(&format!("5. {}\n", self.session.translate("MenuHelpSummary")));
            menu.push_str(&format!("6. {}\n", self.session.translate("MenufileQuit")));
            menu.push_str("\nSelect an option (1-6): ");
            menu
        }

        /// Runs one menu choice; `Ok(false)` means quit.
        pub fn handle<R: BufRead, W: Write>(
            &mut self,
            choice: &str,
            input: &mut R,
            out: &mut W,
        ) -> Result<bool> {
            match choice.trim() {
                "1" => {
                    write!(out, "{}: ", self.session.translate("MenuHelpSearch"))?;
                    out.flush()?;
                    let mut query = String::new();
                    input.read_line(&mut query)?;
                    let transcript = self.session.get_movie(&query)?;
                    write!(out, "{}", transcript)?;
                }
                "2" => {
                    if !self.session.browse().can_next() {
                        writeln!(out, "No next picture.")?;
                    } else if let Some(path) = self.session.next_picture() {
                        writeln!(out, "Showing {}", path.display())?;
                    } else {
                        writeln!(out, "Already at the last picture.")?;
                    }
                }
                "3" => {
                    if !self.session.browse().can_previous() {
                        writeln!(out, "No previous picture.")?;
                    } else if let Some(path) = self.session.previous_picture() {
                        writeln!(out, "Showing {}", path.display())?;
                    } else {
                        writeln!(out, "Already at the first picture.")?;
                    }
                }
                "4" => {
                    let language = self.session.toggle_language();
                    self.session.save()?;
                    writeln!(out, "{}: {}", self.session.translate("MenuLanguage"), language)?;
                }
                "5" => {
                    for (term, label) in self.session.menu_labels() {
                        writeln!(out, "{:<22} {}", term, label)?;
                    }
                }
                "6" => {
                    self.session.save()?;
                    return Ok(false);
                }
                _ => {
                    writeln!(out, "Invalid option. Please select 1-6.")?;
                }
            }
            Ok(true)
        }

        pub fn run_with<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> Result<()> {
            for notice in self.session.take_notices() {
                writeln!(out, "{}", notice)?;
            }
            loop {
                write!(out, "{}", self.render_menu())?;
                out.flush()?;

                let mut choice = String::new();
                if input.read_line(&mut choice)? == 0 {
                    self.session.save()?;
                    break;
                }
                match self.handle(&choice, &mut input, &mut out) {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => {
                        log::error!("run: menu action failed: {:#}", e);
                        writeln!(out, "Failed: {:#}", e)?;
                    }
                }
            }
            Ok(())
        }

        pub fn run(&mut self) -> Result<()> {
            let stdin = io::stdin();
            self.run_with(stdin.lock(), io::stdout())
        }
    }
}
