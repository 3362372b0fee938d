// src/bot/handler.rs

//! Command dispatch for the admin chat.
//!
//! Every inbound message or button press is checked against the admin id
//! before anything else runs. Commands that need a follow-up (`/date`,
//! `/search`, `/getlink`) leave a pending prompt for the chat; the next
//! plain-text message answers it.

use std::collections::HashMap;

use chrono::{Duration, Local, NaiveDate};

use crate::bot::messages;
use crate::bot::{Callback, CallbackAnswer, Command, Reply};
use crate::models::Config;
use crate::services::Catalog;
use crate::utils::{Clock, PageFetcher};

/// Follow-up input a chat is expected to send next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Date,
    Search,
    Url,
}

/// Admin-only chat front end over the movie catalog.
pub struct Bot<F, C> {
    admin_id: i64,
    source: String,
    base_url: String,
    title_len: usize,
    ttl_secs: u64,
    catalog: Catalog<F, C>,
    prompts: HashMap<i64, Prompt>,
}

impl<F: PageFetcher, C: Clock> Bot<F, C> {
    pub fn new(config: &Config, catalog: Catalog<F, C>) -> Self {
        Self {
            admin_id: config.bot.admin_id,
            source: config.site.name.clone(),
            base_url: catalog.base_url().to_string(),
            title_len: config.limits.title_display_len,
            ttl_secs: config.cache.ttl_secs,
            catalog,
            prompts: HashMap::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog<F, C> {
        &self.catalog
    }

    /// Prompt currently pending for a chat.
    pub fn pending_prompt(&self, chat_id: i64) -> Option<Prompt> {
        self.prompts.get(&chat_id).copied()
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        user_id == self.admin_id
    }

    /// Handle a text message (command or free text).
    pub async fn handle_message(&mut self, user_id: i64, chat_id: i64, text: &str) -> Vec<Reply> {
        let command = Command::parse(text);

        if !self.is_admin(user_id) {
            log::warn!("Rejected message from user {}", user_id);
            let denial = match command {
                Some(Command::Start) => messages::ACCESS_DENIED_START,
                _ => messages::ACCESS_DENIED,
            };
            return vec![Reply::text(denial)];
        }

        if text.trim_start().starts_with('/') {
            self.prompts.remove(&chat_id);
            let Some(command) = command else {
                log::debug!("Ignoring unknown command {:?}", text);
                return Vec::new();
            };
            return self.run_command(chat_id, command).await;
        }

        match self.prompts.remove(&chat_id) {
            Some(Prompt::Date) => self.answer_date(text).await,
            Some(Prompt::Search) => self.answer_search(text).await,
            Some(Prompt::Url) => self.answer_url(text).await,
            None => Vec::new(),
        }
    }

    /// Handle an inline button press.
    pub async fn handle_callback(&mut self, user_id: i64, chat_id: i64, data: &str) -> CallbackAnswer {
        if !self.is_admin(user_id) {
            log::warn!("Rejected callback from user {}", user_id);
            return CallbackAnswer::notice(messages::ACCESS_DENIED_CALLBACK);
        }

        let Some(callback) = Callback::parse(data) else {
            log::debug!("Ignoring unknown callback {:?}", data);
            return CallbackAnswer::default();
        };

        match callback {
            Callback::Today => CallbackAnswer::notice(messages::NOTICE_TODAY)
                .with_replies(vec![self.list_for_day(0, messages::TODAY_TITLE).await]),
            Callback::Yesterday => CallbackAnswer::notice(messages::NOTICE_YESTERDAY)
                .with_replies(vec![self.list_for_day(1, messages::YESTERDAY_TITLE).await]),
            Callback::Search => {
                self.prompts.insert(chat_id, Prompt::Search);
                CallbackAnswer::notice(messages::NOTICE_SEARCH)
                    .with_replies(vec![Reply::text(messages::SEARCH_PROMPT)])
            }
            Callback::Stats => CallbackAnswer::notice(messages::NOTICE_STATS)
                .with_replies(vec![self.stats()]),
            Callback::Movie(id) => match self.catalog.find(&id) {
                Some(movie) => CallbackAnswer::notice(messages::getting_links(&movie.title))
                    .with_replies(messages::movie_links(movie)),
                None => CallbackAnswer::notice(messages::NOTICE_STALE_MOVIE),
            },
        }
    }

    async fn run_command(&mut self, chat_id: i64, command: Command) -> Vec<Reply> {
        log::info!("Command {:?} in chat {}", command, chat_id);
        match command {
            Command::Start => vec![messages::help(&self.source)],
            Command::Today => vec![
                Reply::text(messages::FETCHING_TODAY),
                self.list_for_day(0, messages::TODAY_TITLE).await,
            ],
            Command::Yesterday => vec![
                Reply::text(messages::FETCHING_YESTERDAY),
                self.list_for_day(1, messages::YESTERDAY_TITLE).await,
            ],
            Command::Date => {
                self.prompts.insert(chat_id, Prompt::Date);
                vec![Reply::text(messages::DATE_PROMPT)]
            }
            Command::Search => {
                self.prompts.insert(chat_id, Prompt::Search);
                vec![Reply::text(messages::SEARCH_PROMPT)]
            }
            Command::GetLink => {
                self.prompts.insert(chat_id, Prompt::Url);
                vec![Reply::text(messages::url_prompt(&self.base_url))]
            }
            Command::Stats => vec![self.stats()],
        }
    }

    fn today(&self) -> NaiveDate {
        self.catalog.now().with_timezone(&Local).date_naive()
    }

    async fn list_for_day(&mut self, days_ago: i64, title: &str) -> Reply {
        let date = self.today() - Duration::days(days_ago);
        let movies = self.catalog.movies_for_date(date).await;
        messages::movie_list(&movies, title, self.title_len)
    }

    async fn answer_date(&mut self, text: &str) -> Vec<Reply> {
        let input = text.trim();
        let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") else {
            return vec![Reply::text(messages::INVALID_DATE)];
        };
        if date > self.today() {
            return vec![Reply::text(messages::FUTURE_DATE)];
        }

        let movies = self.catalog.movies_for_date(date).await;
        vec![
            Reply::text(messages::fetching_date(input)),
            messages::movie_list(&movies, &messages::date_title(input), self.title_len),
        ]
    }

    async fn answer_search(&mut self, text: &str) -> Vec<Reply> {
        let query = text.trim();
        let mut replies = vec![Reply::text(messages::searching(query))];

        let movies = self.catalog.search(query).await;
        if movies.is_empty() {
            replies.push(Reply::text(messages::no_search_results(query)));
        } else {
            replies.push(messages::movie_list(
                &movies,
                &messages::search_title(query),
                self.title_len,
            ));
        }
        replies
    }

    async fn answer_url(&mut self, text: &str) -> Vec<Reply> {
        let url = text.trim();
        if !url.starts_with("http") {
            return vec![Reply::text(messages::INVALID_URL)];
        }

        match self.catalog.extract_links(url).await {
            Ok(links) if links.is_empty() => vec![Reply::text(messages::NO_LINKS_IN_URL)],
            Ok(links) => {
                let mut replies = vec![Reply::text(messages::found_links(links.len()))];
                replies.extend(
                    links
                        .iter()
                        .map(|link| Reply::text(link.render()).without_preview()),
                );
                replies
            }
            Err(e) => {
                log::error!("Error processing URL {}: {}", url, e);
                vec![Reply::text(messages::URL_ERROR)]
            }
        }
    }

    fn stats(&self) -> Reply {
        Reply::text(messages::stats(
            &self.catalog.stats(),
            &self.source,
            self.admin_id,
            self.ttl_secs,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::utils::ManualClock;
    use crate::utils::http::fake::StaticFetcher;

    const BASE: &str = "https://forum.example/";
    const ADMIN: i64 = 1001;
    const CHAT: i64 = 55;

    type TestBot = Bot<Arc<StaticFetcher>, Arc<ManualClock>>;

    fn listing(titles: &[&str]) -> String {
        titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                format!(
                    "<div class=\"ipsType_break ipsContained\"><a href=\"/topic/{i}\">{title}</a></div>"
                )
            })
            .collect()
    }

    fn site(titles: &[&str]) -> Arc<StaticFetcher> {
        let pages = StaticFetcher::new().with_page(BASE, &listing(titles));
        for i in 0..titles.len() {
            pages.set_page(
                &format!("{BASE}topic/{i}"),
                &format!(
                    "<div class=\"cPost_contentWrap\"><a data-fileext=\"torrent\" href=\"/files/{i}.torrent\">Part {i}</a><a href=\"magnet:?xt=urn:btih:{i}\">m</a></div>"
                ),
            );
        }
        Arc::new(pages)
    }

    fn bot(pages: &Arc<StaticFetcher>) -> (TestBot, Arc<ManualClock>) {
        let mut config = Config::default();
        config.site.base_url = BASE.to_string();
        config.bot.admin_id = ADMIN;
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let catalog = Catalog::new(&config, Arc::clone(pages), Arc::clone(&clock)).unwrap();
        (Bot::new(&config, catalog), clock)
    }

    #[tokio::test]
    async fn test_non_admin_is_denied_without_fetching() {
        let pages = site(&["Leo (2023)"]);
        let (mut bot, _) = bot(&pages);

        let replies = bot.handle_message(7, CHAT, "/today").await;
        assert_eq!(replies, vec![Reply::text(messages::ACCESS_DENIED)]);

        let replies = bot.handle_message(7, CHAT, "/start").await;
        assert_eq!(replies, vec![Reply::text(messages::ACCESS_DENIED_START)]);

        let answer = bot.handle_callback(7, CHAT, "today").await;
        assert_eq!(answer.notice.as_deref(), Some(messages::ACCESS_DENIED_CALLBACK));
        assert!(answer.replies.is_empty());

        assert_eq!(pages.request_count(), 0);
    }

    #[tokio::test]
    async fn test_start_shows_menu() {
        let pages = site(&[]);
        let (mut bot, _) = bot(&pages);
        let replies = bot.handle_message(ADMIN, CHAT, "/start").await;
        assert_eq!(replies.len(), 1);
        assert!(replies[0].text.contains("/getlink"));
        let data: Vec<_> = replies[0]
            .buttons
            .iter()
            .flatten()
            .map(|b| b.data.as_str())
            .collect();
        assert_eq!(data, vec!["today", "yesterday", "search", "stats"]);
    }

    #[tokio::test]
    async fn test_today_lists_movies() {
        let pages = site(&["Leo (2023)", "Jailer (2023)"]);
        let (mut bot, _) = bot(&pages);

        let replies = bot.handle_message(ADMIN, CHAT, "/today").await;
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].text, messages::FETCHING_TODAY);
        assert!(replies[1].text.contains("(2 found)"));
        assert_eq!(replies[1].buttons.len(), 2);
    }

    #[tokio::test]
    async fn test_today_with_empty_listing() {
        let pages = site(&[]);
        let (mut bot, _) = bot(&pages);
        let replies = bot.handle_message(ADMIN, CHAT, "/today").await;
        assert_eq!(replies[1].text, "❌ No movies found for 📅 Today's Posts");
    }

    #[tokio::test]
    async fn test_movie_selection_sends_links() {
        let pages = site(&["Leo (2023)", "Jailer (2023)"]);
        let (mut bot, _) = bot(&pages);

        let replies = bot.handle_message(ADMIN, CHAT, "/yesterday").await;
        let data = replies[1].buttons[1][0].data.clone();

        let answer = bot.handle_callback(ADMIN, CHAT, &data).await;
        assert_eq!(answer.notice.as_deref(), Some("Getting links for Jailer (2023)"));
        assert_eq!(answer.replies.len(), 1);
        assert!(answer.replies[0].text.contains("/files/1.torrent"));
        assert!(answer.replies[0].disable_preview);
    }

    #[tokio::test]
    async fn test_stale_selection_after_refresh() {
        let pages = site(&["Leo (2023)", "Jailer (2023)"]);
        let (mut bot, clock) = bot(&pages);

        let replies = bot.handle_message(ADMIN, CHAT, "/today").await;
        let jailer = replies[1].buttons[1][0].data.clone();
        let leo = replies[1].buttons[0][0].data.clone();

        pages.set_page(BASE, &listing(&["Leo (2023)"]));
        clock.advance(Duration::seconds(301));
        bot.handle_message(ADMIN, CHAT, "/today").await;

        let answer = bot.handle_callback(ADMIN, CHAT, &jailer).await;
        assert_eq!(answer.notice.as_deref(), Some(messages::NOTICE_STALE_MOVIE));
        assert!(answer.replies.is_empty());

        let answer = bot.handle_callback(ADMIN, CHAT, &leo).await;
        assert_eq!(answer.notice.as_deref(), Some("Getting links for Leo (2023)"));
    }

    #[tokio::test]
    async fn test_search_flow() {
        let pages = site(&["Leo (2023) Tamil", "Jailer (2023)"]);
        let (mut bot, _) = bot(&pages);

        let replies = bot.handle_message(ADMIN, CHAT, "/search").await;
        assert_eq!(replies, vec![Reply::text(messages::SEARCH_PROMPT)]);
        assert_eq!(bot.pending_prompt(CHAT), Some(Prompt::Search));

        let replies = bot.handle_message(ADMIN, CHAT, "LEO").await;
        assert_eq!(replies[0].text, "🔍 <b>Searching for:</b> LEO");
        assert!(replies[1].text.starts_with("<b>🔍 Search Results for 'LEO'</b>"));
        assert_eq!(replies[1].buttons.len(), 1);
        assert_eq!(bot.pending_prompt(CHAT), None);
    }

    #[tokio::test]
    async fn test_search_without_match_names_query() {
        let pages = site(&["Leo (2023)"]);
        let (mut bot, _) = bot(&pages);

        let answer = bot.handle_callback(ADMIN, CHAT, "search").await;
        assert_eq!(answer.notice.as_deref(), Some(messages::NOTICE_SEARCH));

        let replies = bot.handle_message(ADMIN, CHAT, "vikram").await;
        assert_eq!(replies[1].text, "❌ No movies found for '<b>vikram</b>'");
    }

    #[tokio::test]
    async fn test_date_flow() {
        let pages = site(&["Leo (2023)"]);
        let (mut bot, _) = bot(&pages);

        bot.handle_message(ADMIN, CHAT, "/date").await;
        let replies = bot.handle_message(ADMIN, CHAT, "15-01-2024").await;
        assert_eq!(replies, vec![Reply::text(messages::INVALID_DATE)]);
        assert_eq!(bot.pending_prompt(CHAT), None);

        bot.handle_message(ADMIN, CHAT, "/date").await;
        let replies = bot.handle_message(ADMIN, CHAT, "2999-01-01").await;
        assert_eq!(replies, vec![Reply::text(messages::FUTURE_DATE)]);
        assert_eq!(pages.request_count(), 0);

        bot.handle_message(ADMIN, CHAT, "/date").await;
        let replies = bot.handle_message(ADMIN, CHAT, " 2024-01-15 ").await;
        assert_eq!(replies[0].text, "🔄 <b>Fetching posts for 2024-01-15...</b>");
        assert!(replies[1].text.starts_with("<b>📅 Posts for 2024-01-15</b>"));
    }

    #[tokio::test]
    async fn test_getlink_flow() {
        let pages = site(&["Leo (2023)"]);
        let (mut bot, _) = bot(&pages);

        bot.handle_message(ADMIN, CHAT, "/getlink").await;
        let replies = bot.handle_message(ADMIN, CHAT, "forum.example/topic/0").await;
        assert_eq!(replies, vec![Reply::text(messages::INVALID_URL)]);

        bot.handle_message(ADMIN, CHAT, "/getlink").await;
        let replies = bot
            .handle_message(ADMIN, CHAT, "https://forum.example/topic/0")
            .await;
        assert_eq!(replies[0].text, messages::found_links(1));
        assert!(replies[1].text.contains("https://forum.example/files/0.torrent"));

        bot.handle_message(ADMIN, CHAT, "/getlink").await;
        let replies = bot
            .handle_message(ADMIN, CHAT, "https://forum.example/missing")
            .await;
        assert_eq!(replies, vec![Reply::text(messages::URL_ERROR)]);
    }

    #[tokio::test]
    async fn test_getlink_page_without_links() {
        let pages = site(&[]);
        pages.set_page("https://forum.example/empty", "<div class=\"cPost_contentWrap\"></div>");
        let (mut bot, _) = bot(&pages);

        bot.handle_message(ADMIN, CHAT, "/getlink").await;
        let replies = bot
            .handle_message(ADMIN, CHAT, "https://forum.example/empty")
            .await;
        assert_eq!(replies, vec![Reply::text(messages::NO_LINKS_IN_URL)]);
    }

    #[tokio::test]
    async fn test_command_clears_pending_prompt() {
        let pages = site(&["Leo (2023)"]);
        let (mut bot, _) = bot(&pages);

        bot.handle_message(ADMIN, CHAT, "/search").await;
        bot.handle_message(ADMIN, CHAT, "/stats").await;
        assert_eq!(bot.pending_prompt(CHAT), None);
        assert!(bot.handle_message(ADMIN, CHAT, "leo").await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_command_clears_pending_prompt() {
        let pages = site(&["Leo (2023)"]);
        let (mut bot, _) = bot(&pages);

        bot.handle_message(ADMIN, CHAT, "/date").await;
        assert!(bot.handle_message(ADMIN, CHAT, "/foo").await.is_empty());
        assert_eq!(bot.pending_prompt(CHAT), None);
        assert!(bot.handle_message(ADMIN, CHAT, "2024-01-15").await.is_empty());
        assert_eq!(pages.request_count(), 0);
    }

    #[tokio::test]
    async fn test_stats_after_listing() {
        let pages = site(&["Leo (2023)", "Jailer (2023)"]);
        let (mut bot, clock) = bot(&pages);

        let replies = bot.handle_message(ADMIN, CHAT, "/stats").await;
        assert!(replies[0].text.contains("<b>Last Update:</b> No cache"));

        bot.handle_message(ADMIN, CHAT, "/today").await;
        clock.advance(Duration::seconds(125));
        let answer = bot.handle_callback(ADMIN, CHAT, "stats").await;
        let text = &answer.replies[0].text;
        assert!(text.contains("<b>Cached Movies:</b> 2"));
        assert!(text.contains("<b>Last Update:</b> 2 minutes ago"));
        assert!(text.contains("<b>Admin ID:</b> 1001"));
    }
}
