use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::auth::{Credentials, OAuthFlow};
use crate::commands::view;
use crate::config::OAuthClientConfig;
use crate::error::Result;
use crate::listing::{PageSize, SortOrder};
use crate::session::Session;
use crate::youtube::YouTube;

/// One line typed at the `wl>` prompt
#[derive(Parser)]
#[command(multicall = true)]
struct PromptLine {
    #[command(subcommand)]
    command: PromptCommand,
}

#[derive(Subcommand)]
enum PromptCommand {
    /// List your playlists (Watch Later is always first)
    Playlists,

    /// Fetch a playlist and sort it by duration
    Fetch {
        /// Playlist number from `playlists`, playlist ID or title
        #[arg(required = true, num_args = 1..)]
        playlist: Vec<String>,

        /// Sort order for the fetched videos
        #[arg(short, long, value_enum)]
        order: Option<SortOrder>,
    },

    /// Load videos from pasted links (reads until an empty line)
    Paste {
        /// Read links from a file instead of the terminal
        file: Option<PathBuf>,

        /// Sort order for the fetched videos
        #[arg(short, long, value_enum)]
        order: Option<SortOrder>,
    },

    /// Change the sort order
    Order {
        #[arg(value_enum)]
        order: SortOrder,
    },

    /// Filter by title (no text clears the filter)
    Search {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Videos per page (10, 20, 50 or 100)
    Size { size: usize },

    /// Next page
    Next,

    /// Previous page
    Prev,

    /// Show the current page as cards
    Show,

    /// Show the current page as a compact list
    List {
        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign out and clear everything fetched so far
    Signout,

    /// Leave the program
    #[command(alias = "exit")]
    Quit,
}

enum Exit {
    SignOut,
    Quit,
}

pub async fn run(page_size: usize, order: SortOrder) -> Result<()> {
    let page_size = PageSize::try_from(page_size)?;
    let config = OAuthClientConfig::from_env()?;
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        let Some(credentials) = sign_in(&config, &mut input).await? else {
            return Ok(());
        };

        let mut session = Session::new(Box::new(YouTube::new(&credentials)?), page_size);
        let exit = browse(&mut session, order, &mut input).await?;
        session.sign_out();

        match exit {
            Exit::SignOut => println!("Signed out.\n"),
            Exit::Quit => return Ok(()),
        }
    }
}

/// Show the sign-in link and wait for the redirect URL; `None` if the user gives up
async fn sign_in(config: &OAuthClientConfig, input: &mut impl BufRead) -> Result<Option<Credentials>> {
    let flow = OAuthFlow::new(config.clone())?;

    println!("Please sign in to access your YouTube account:\n");
    println!("  {}\n", flow.authorization_url()?);
    println!("After granting access, paste the URL you were redirected to (or just the code).");

    loop {
        let Some(line) = prompt(input, "code> ")? else {
            return Ok(None);
        };
        if matches!(line.as_str(), "quit" | "exit") {
            return Ok(None);
        }

        let result = match flow.code_from_input(&line) {
            Ok(code) => flow.exchange_code(&code).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(credentials) => {
                println!("Signed in.\n");
                return Ok(Some(credentials));
            }
            Err(e) => eprintln!("Error: {}\nTry again, or type `quit`.", e),
        }
    }
}

async fn browse(session: &mut Session, mut order: SortOrder, input: &mut impl BufRead) -> Result<Exit> {
    if let Some(warning) = session.refresh_playlists().await {
        view::print_warnings(&[warning]);
    }
    view::print_playlists(session.playlists());
    println!("Type `help` for commands.");

    loop {
        let Some(line) = prompt(input, "wl> ")? else {
            return Ok(Exit::Quit);
        };
        if line.is_empty() {
            continue;
        }

        let command = match PromptLine::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                let _ = e.print();
                continue;
            }
        };

        // Errors inside the session are reported and the prompt carries on
        match dispatch(session, &mut order, command, input).await {
            Ok(Some(exit)) => return Ok(exit),
            Ok(None) => {}
            Err(e) => eprintln!("Error: {}", e),
        }
    }
}

async fn dispatch(
    session: &mut Session,
    order: &mut SortOrder,
    command: PromptCommand,
    input: &mut impl BufRead,
) -> Result<Option<Exit>> {
    match command {
        PromptCommand::Playlists => {
            if let Some(warning) = session.refresh_playlists().await {
                view::print_warnings(&[warning]);
            }
            view::print_playlists(session.playlists());
        }
        PromptCommand::Fetch { playlist, order: requested } => {
            let playlist = session.resolve_playlist(&playlist.join(" "))?;
            *order = requested.unwrap_or(*order);

            eprintln!("Fetching videos from '{}'...", playlist.title);
            let report = session.load_playlist(&playlist.id, *order).await;
            view::print_warnings(&report.warnings);

            if report.is_empty() {
                if playlist.is_watch_later() {
                    eprintln!(
                        "No videos found in '{}'. If this is Watch Later, the API is likely blocked; \
                         use `paste` with the links from your Watch Later page instead.",
                        playlist.title
                    );
                } else {
                    eprintln!("No videos found in '{}'.", playlist.title);
                }
                return Ok(None);
            }
            show(session, Layout::Cards)?;
        }
        PromptCommand::Paste { file, order: requested } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => read_paste(input)?,
            };
            *order = requested.unwrap_or(*order);

            let report = session.load_pasted(&text, *order).await?;
            view::print_warnings(&report.warnings);
            if report.is_empty() {
                eprintln!("Error: Could not fetch video details.");
                return Ok(None);
            }
            show(session, Layout::Cards)?;
        }
        PromptCommand::Order { order: requested } => {
            *order = requested;
            session.set_sort_order(requested);
            show(session, Layout::Cards)?;
        }
        PromptCommand::Search { text } => {
            session.set_search(&text.join(" "));
            show(session, Layout::Cards)?;
        }
        PromptCommand::Size { size } => {
            session.set_page_size(PageSize::try_from(size)?);
            show(session, Layout::Cards)?;
        }
        PromptCommand::Next => {
            if session.next_page() {
                show(session, Layout::Cards)?;
            } else if session.view().is_some() {
                eprintln!("Already on the last page.");
            } else {
                show(session, Layout::Cards)?;
            }
        }
        PromptCommand::Prev => {
            if session.previous_page() {
                show(session, Layout::Cards)?;
            } else if session.view().is_some() {
                eprintln!("Already on the first page.");
            } else {
                show(session, Layout::Cards)?;
            }
        }
        PromptCommand::Show => show(session, Layout::Cards)?,
        PromptCommand::List { json } => {
            show(session, if json { Layout::Json } else { Layout::List })?;
        }
        PromptCommand::Signout => return Ok(Some(Exit::SignOut)),
        PromptCommand::Quit => return Ok(Some(Exit::Quit)),
    }
    Ok(None)
}

enum Layout {
    Cards,
    List,
    Json,
}

fn show(session: &mut Session, layout: Layout) -> Result<()> {
    let Some(state) = session.view() else {
        println!("Nothing fetched yet. Use `fetch` or `paste`.");
        return Ok(());
    };
    let order = state.sort_order;
    let search = state.search_text.clone();

    if let Some(page) = session.current_page() {
        match layout {
            Layout::Cards => view::print_page(&page, order, &search),
            Layout::List => view::print_list(&page, order, &search),
            Layout::Json => view::print_json(&page, order, &search)?,
        }
    }
    Ok(())
}

/// Read pasted links until an empty line or end of input
fn read_paste(input: &mut impl BufRead) -> Result<String> {
    println!("Paste links, one or more per line. Finish with an empty line.");

    let mut text = String::new();
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            break;
        }
        text.push_str(&line);
        text.push('\n');
    }
    Ok(text)
}

fn prompt(input: &mut impl BufRead, label: &str) -> Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> PromptCommand {
        PromptLine::try_parse_from(line.split_whitespace()).unwrap().command
    }

    #[test]
    fn fetch_accepts_multi_word_titles() {
        match parse("fetch Watch Later --order longest") {
            PromptCommand::Fetch { playlist, order } => {
                assert_eq!(playlist.join(" "), "Watch Later");
                assert_eq!(order, Some(SortOrder::Longest));
            }
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn search_keeps_dashes_and_allows_empty() {
        match parse("search -- live -ish") {
            PromptCommand::Search { text } => assert_eq!(text.join(" "), "live -ish"),
            _ => panic!("expected search"),
        }
        assert!(matches!(parse("search"), PromptCommand::Search { text } if text.is_empty()));
    }

    #[test]
    fn rejects_unknown_commands() {
        assert!(PromptLine::try_parse_from(["dance"]).is_err());
        assert!(PromptLine::try_parse_from(["order", "random"]).is_err());
    }

    #[test]
    fn paste_reads_until_blank_line() {
        let mut input = io::Cursor::new("https://youtu.be/aaaaaaaaaaa\nhttps://youtu.be/bbbbbbbbbbb\n\nwl> next\n");
        let text = read_paste(&mut input).unwrap();
        assert_eq!(text, "https://youtu.be/aaaaaaaaaaa\nhttps://youtu.be/bbbbbbbbbbb\n");
    }
}
