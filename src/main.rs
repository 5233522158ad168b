mod chat_clipboard;
mod config;
mod pacing;
mod quiz;
mod routes;
mod screens;
mod share;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use chat_clipboard::{PlainText, TapToCopy};
use config::Config;
use log::{debug, error, info, warn};
use pacing::{PacingTimers, TimerKind};
use quiz::{
    crew::{self, Character},
    flow::{Clock, FlowEvent, QuizFlow, Screen, SystemClock, ADVANCE_DELAY},
};
use routes::{resolve_shared_result, Route, SharedResult};
use share::{
    build_share_artifacts,
    clipboard::{copy_to_clipboard, CopyOutcome, CopyTarget, Toast},
    meta::{InMemorySink, Site, SocialMeta},
};
use teloxide::{
    dispatching::dialogue::{serializer::Json, ErasedStorage, SqliteStorage, Storage},
    prelude::*,
    types::ParseMode,
};

type QuizDialogue = Dialogue<State, ErasedStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
type QuizStorage = std::sync::Arc<ErasedStorage<State>>;

#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum State {
    #[default]
    Start,
    Crew {
        flow: QuizFlow,
    },
    SharedResult {
        slug: String,
    },
}

/// Everything the handlers share across chats.
pub struct App {
    site: Site,
    clock: Box<dyn Clock>,
    timers: Arc<PacingTimers<ChatId>>,
    /// Social tags last written for each chat's result page.
    previews: Mutex<HashMap<ChatId, InMemorySink>>,
}

impl App {
    fn new(site: Site, clock: Box<dyn Clock>) -> Self {
        Self {
            site,
            clock,
            timers: PacingTimers::new(),
            previews: Mutex::new(HashMap::new()),
        }
    }

    /// Writes `meta` over the chat's previous tags and returns the result.
    fn publish_preview(&self, chat_id: ChatId, meta: &SocialMeta) -> InMemorySink {
        let mut previews = self.previews();
        let sink = previews.entry(chat_id).or_default();
        meta.apply(sink);
        sink.clone()
    }

    /// Drops the chat's tags once it has left the result pages.
    fn forget_preview(&self, chat_id: ChatId) {
        self.previews().remove(&chat_id);
    }

    fn previews(&self) -> MutexGuard<'_, HashMap<ChatId, InMemorySink>> {
        match self.previews.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let config = Config::from_env()?;
    crew::verify_registry()?;
    info!("Starting crew quiz bot for {}", config.site.base_url);

    let bot = Bot::from_env();

    info!("Opening chat storage at {}", config.db_path);
    let storage: QuizStorage = SqliteStorage::open(&config.db_path, Json).await?.erase();

    let app = Arc::new(App::new(config.site, Box::new(SystemClock)));

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, ErasedStorage<State>, State>()
            .branch(dptree::filter_map(route_from_message).endpoint(open_route))
            .branch(dptree::case![State::Start].endpoint(open_welcome))
            .branch(dptree::case![State::Crew { flow }].endpoint(crew_flow))
            .branch(dptree::case![State::SharedResult { slug }].endpoint(shared_result)),
    )
    .dependencies(dptree::deps![storage, app.clone()])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;

    app.timers.cancel_all();
    info!("Bot stopped");
    Ok(())
}

/// `/start`, `/start <slug>`, `/result <slug>` and pasted share links open a
/// route from any state.
fn route_from_message(msg: Message) -> Option<Route> {
    msg.text().and_then(route_from_text)
}

fn route_from_text(text: &str) -> Option<Route> {
    let text = text.trim();
    if let Some(route) = Route::from_share_url(text) {
        return Some(route);
    }

    let (command, payload) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
    // Commands may be addressed as /start@crew_quiz_bot in groups
    let command = command.split('@').next().unwrap_or(command);
    match command {
        "/start" => Some(Route::from_start_payload(payload)),
        "/result" => Some(Route::parse(&format!("/result/{}", payload.trim()))),
        _ => None,
    }
}

async fn send_screen(bot: &Bot, chat_id: ChatId, screen: screens::Screen) -> HandlerResult {
    bot.send_message(chat_id, screen.text)
        .parse_mode(ParseMode::Html)
        .disable_web_page_preview(true)
        .reply_markup(screen.keyboard)
        .await?;
    Ok(())
}

async fn open_route(
    bot: Bot,
    dialogue: QuizDialogue,
    app: Arc<App>,
    msg: Message,
    route: Route,
) -> HandlerResult {
    abandon_flow(&app, &dialogue, msg.chat.id).await?;
    match route {
        Route::Quiz => welcome(&bot, &dialogue, &app, msg.chat.id).await,
        Route::SharedResult { slug } => {
            debug!("Chat {} opened shared result {:?}", msg.chat.id.0, slug);
            show_shared_result(&bot, &app, msg.chat.id, &slug).await?;
            dialogue.update(State::SharedResult { slug }).await?;
            Ok(())
        }
    }
}

async fn open_welcome(
    bot: Bot,
    dialogue: QuizDialogue,
    app: Arc<App>,
    msg: Message,
) -> HandlerResult {
    welcome(&bot, &dialogue, &app, msg.chat.id).await
}

async fn welcome(bot: &Bot, dialogue: &QuizDialogue, app: &App, chat_id: ChatId) -> HandlerResult {
    app.forget_preview(chat_id);
    send_screen(bot, chat_id, screens::welcome()).await?;
    dialogue.update(State::Crew { flow: QuizFlow::new() }).await?;
    Ok(())
}

/// Stops a quiz that is still waiting to move on before the chat is sent
/// somewhere else.
async fn abandon_flow(app: &App, dialogue: &QuizDialogue, chat_id: ChatId) -> HandlerResult {
    app.timers.cancel(chat_id, TimerKind::Advance);
    if let Some(State::Crew { mut flow }) = dialogue.get().await? {
        if flow.advance_due().is_some() {
            flow.teardown();
            dialogue.update(State::Crew { flow }).await?;
            debug!("Dropped pending advance in chat {}", chat_id.0);
        }
    }
    Ok(())
}

async fn crew_flow(
    bot: Bot,
    dialogue: QuizDialogue,
    app: Arc<App>,
    flow: QuizFlow,
    msg: Message,
) -> HandlerResult {
    let chat_id = msg.chat.id;
    let mut flow = flow;
    let now = app.clock.now();

    // An advance may have come due while the bot was down
    if flow.poll(now).is_some() {
        dialogue.update(State::Crew { flow: flow.clone() }).await?;
        show_flow_screen(&bot, &app, chat_id, &flow).await?;
        return Ok(());
    }

    let text = msg.text().unwrap_or_default();
    match flow.screen() {
        Screen::Welcome => {
            if text == screens::START_QUIZ {
                flow.start();
            }
            dialogue.update(State::Crew { flow: flow.clone() }).await?;
            show_flow_screen(&bot, &app, chat_id, &flow).await?;
        }
        Screen::Quiz { index } => {
            if text == screens::BACK {
                if let FlowEvent::WentBack { .. } = flow.back() {
                    dialogue.update(State::Crew { flow: flow.clone() }).await?;
                    show_flow_screen(&bot, &app, chat_id, &flow).await?;
                }
                return Ok(());
            }

            let picked = quiz::QUESTIONS[index].option_by_label(text);
            let option = match picked {
                Some(option) => option,
                None => {
                    bot.send_message(chat_id, "Pick one of the answers on the keyboard, matey!")
                        .await?;
                    return Ok(());
                }
            };
            if let FlowEvent::Selected { .. } = flow.select(option.value, now) {
                dialogue.update(State::Crew { flow }).await?;
                bot.send_message(chat_id, format!("✅ {}", option.button_text()))
                    .await?;
                schedule_advance(bot, dialogue, app, chat_id);
            }
        }
        Screen::Result { member } => {
            let character = member.character();
            match text {
                screens::TAKE_QUIZ_AGAIN => {
                    app.timers.cancel(chat_id, TimerKind::Advance);
                    flow.retake();
                    dialogue.update(State::Crew { flow: flow.clone() }).await?;
                    show_flow_screen(&bot, &app, chat_id, &flow).await?;
                }
                screens::SHARE_RESULT => {
                    let artifacts = build_share_artifacts(character, &app.site.base_url);
                    send_screen(&bot, chat_id, screens::share_dialog(character, &artifacts))
                        .await?;
                }
                screens::COPY_LINK | screens::DIALOG_COPY_LINK | screens::DIALOG_COPY_MESSAGE => {
                    share_result(&bot, &app, chat_id, character, text).await?;
                }
                _ => show_flow_screen(&bot, &app, chat_id, &flow).await?,
            }
        }
    }
    Ok(())
}

fn schedule_advance(bot: Bot, dialogue: QuizDialogue, app: Arc<App>, chat_id: ChatId) {
    let timers = app.timers.clone();
    timers.schedule(chat_id, TimerKind::Advance, ADVANCE_DELAY, async move {
        if let Err(err) = fire_advance(bot, dialogue, app, chat_id).await {
            error!("Failed to advance quiz in chat {}: {}", chat_id.0, err);
        }
    });
}

async fn fire_advance(
    bot: Bot,
    dialogue: QuizDialogue,
    app: Arc<App>,
    chat_id: ChatId,
) -> HandlerResult {
    let mut flow = match dialogue.get().await? {
        Some(State::Crew { flow }) => flow,
        _ => {
            warn!("Dropping advance for chat {}: quiz no longer running", chat_id.0);
            return Ok(());
        }
    };
    // The timer only fires once the deadline has passed
    let now = app
        .clock
        .now()
        .max(flow.advance_due().unwrap_or_default());
    let event = match flow.poll(now) {
        Some(event) => event,
        None => return Ok(()),
    };
    if let FlowEvent::Completed { member } = event {
        info!("Chat {} joined the crew as {}", chat_id.0, member.short_key());
    }
    dialogue.update(State::Crew { flow: flow.clone() }).await?;
    show_flow_screen(&bot, &app, chat_id, &flow).await
}

async fn show_flow_screen(
    bot: &Bot,
    app: &App,
    chat_id: ChatId,
    flow: &QuizFlow,
) -> HandlerResult {
    match flow.screen() {
        Screen::Welcome => {
            app.forget_preview(chat_id);
            send_screen(bot, chat_id, screens::welcome()).await
        }
        Screen::Quiz { index } => {
            send_screen(bot, chat_id, screens::question(index, flow.highlighted())).await
        }
        Screen::Result { member } => {
            let character = member.character();
            let artifacts = build_share_artifacts(character, &app.site.base_url);
            let meta =
                app.publish_preview(chat_id, &SocialMeta::for_character(character, &app.site));
            send_screen(
                bot,
                chat_id,
                screens::result_card(character, &artifacts, &meta, false),
            )
            .await
        }
    }
}

async fn shared_result(
    bot: Bot,
    dialogue: QuizDialogue,
    app: Arc<App>,
    slug: String,
    msg: Message,
) -> HandlerResult {
    let chat_id = msg.chat.id;
    let text = msg.text().unwrap_or_default();
    if text == screens::FIND_YOUR_CREW {
        abandon_flow(&app, &dialogue, chat_id).await?;
        return welcome(&bot, &dialogue, &app, chat_id).await;
    }
    match resolve_shared_result(&slug) {
        SharedResult::Found(character) if text == screens::COPY_LINK => {
            share_result(&bot, &app, chat_id, character, text).await
        }
        _ => show_shared_result(&bot, &app, chat_id, &slug).await,
    }
}

async fn show_shared_result(
    bot: &Bot,
    app: &App,
    chat_id: ChatId,
    slug: &str,
) -> HandlerResult {
    let screen = match resolve_shared_result(slug) {
        SharedResult::Found(character) => {
            let artifacts = build_share_artifacts(character, &app.site.base_url);
            let meta =
                app.publish_preview(chat_id, &SocialMeta::for_character(character, &app.site));
            screens::result_card(character, &artifacts, &meta, true)
        }
        SharedResult::NotFound { slug } => {
            info!("Chat {} asked for unknown crew member {:?}", chat_id.0, slug);
            let meta = app.publish_preview(chat_id, &SocialMeta::not_found(&app.site));
            screens::not_found(&slug, &meta)
        }
    };
    send_screen(bot, chat_id, screen).await
}

/// Copies the link or the share message, depending on which button was
/// pressed, and shows a short-lived acknowledgement.
async fn share_result(
    bot: &Bot,
    app: &App,
    chat_id: ChatId,
    character: &Character,
    button: &str,
) -> HandlerResult {
    let artifacts = build_share_artifacts(character, &app.site.base_url);
    let (target, text, toast) = match button {
        screens::DIALOG_COPY_MESSAGE => (
            CopyTarget::Message,
            &artifacts.share_message,
            Toast::DIALOG_MESSAGE_COPIED,
        ),
        screens::DIALOG_COPY_LINK => {
            (CopyTarget::Link, &artifacts.share_url, Toast::DIALOG_LINK_COPIED)
        }
        _ => (CopyTarget::Link, &artifacts.share_url, Toast::LINK_COPIED),
    };

    let primary = TapToCopy {
        bot: bot.clone(),
        chat_id,
    };
    let fallback = PlainText {
        bot: bot.clone(),
        chat_id,
    };
    match copy_to_clipboard(&primary, &fallback, target, text).await {
        CopyOutcome::Failed { notice } => {
            bot.send_message(chat_id, notice).await?;
        }
        outcome => {
            debug!("Copied {} for chat {} via {:?}", artifacts.slug, chat_id.0, outcome);
            let ack_id = bot.send_message(chat_id, toast.text).await?.id;
            let bot = bot.clone();
            let kind = TimerKind::Toast(ack_id.0);
            app.timers.schedule(chat_id, kind, toast.dismiss_after, async move {
                if let Err(err) = bot.delete_message(chat_id, ack_id).await {
                    debug!("Toast in chat {} already gone: {}", chat_id.0, err);
                }
            });
        }
    }
    Ok(())
}
