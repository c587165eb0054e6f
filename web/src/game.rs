use crate::storage::LocalScoreStore;
use crate::utils::*;
use clap::Args;
use gloo::timers::callback::Timeout;
use memo_bits_core as game;
use web_time::Instant;
use yew::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    SelectCard(game::CardId),
    Tick,
    NewGame,
}

/// Short signal for the player when a pair resolves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Feedback {
    Success,
    Error,
}

impl Feedback {
    fn for_outcome(outcome: game::SelectOutcome) -> Option<Self> {
        use game::SelectOutcome::*;

        match outcome {
            Matched | Completed => Some(Self::Success),
            Mismatched => Some(Self::Error),
            Flipped | NoChange => None,
        }
    }

    fn class(self) -> &'static str {
        match self {
            Self::Success => "match",
            Self::Error => "mismatch",
        }
    }

    fn vibration_millis(self) -> u32 {
        match self {
            Self::Success => 40,
            Self::Error => 200,
        }
    }

    /// Best effort, devices without a vibration motor just ignore it.
    fn vibrate(self) {
        let vibrated = gloo::utils::window()
            .navigator()
            .vibrate_with_duration(self.vibration_millis());
        log::trace!("{:?} feedback, vibrated: {}", self, vibrated);
    }
}

#[derive(Properties, Clone, PartialEq)]
struct CardProps {
    card: game::Card,
    #[prop_or_default]
    locked: bool,
    callback: Callback<game::CardId>,
}

fn card_classes(card: &game::Card, locked: bool) -> Classes {
    let mut class = classes!("card");
    if card.is_face_up() {
        class.push("flipped");
    }
    if card.is_matched {
        class.push("matched");
    }
    if locked || !card.is_selectable() {
        class.push("locked");
    }
    class
}

#[function_component(CardView)]
fn card_component(props: &CardProps) -> Html {
    let CardProps {
        card,
        locked,
        callback,
    } = props.clone();

    let class = card_classes(&card, locked);
    let face = card.is_face_up().then(|| card.symbol.to_string());
    let id = card.id;
    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("card {} tapped", id);
        callback.emit(id);
    });

    html! {
        <button {class} {onclick} disabled={locked}>
            <span>{face.unwrap_or_default()}</span>
        </button>
    }
}

#[derive(Properties, Clone, PartialEq)]
struct WinProps {
    moves: game::MoveCount,
    best_score: Option<game::MoveCount>,
    is_new_record: bool,
    on_play_again: Callback<MouseEvent>,
}

#[function_component(WinDialog)]
fn win_dialog(props: &WinProps) -> Html {
    let best = props
        .best_score
        .map_or_else(|| "-".to_string(), |best| best.to_string());

    html! {
        <Modal>
            <dialog class="win" open={true}>
                <article>
                    <h2>{"🎉 You Won! 🎉"}</h2>
                    <p>{format!("Completed in {} moves", props.moves)}</p>
                    if props.is_new_record {
                        <p class="record">{"New record!"}</p>
                    }
                    <p>{format!("Best: {}", best)}</p>
                    <footer>
                        <button onclick={props.on_play_again.clone()}>{"Play Again"}</button>
                    </footer>
                </article>
            </dialog>
        </Modal>
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    pub(crate) seed: Option<u64>,
}

/// Host for the matching engine: feeds it taps and wall-clock time, renders its snapshots.
pub(crate) struct GameView {
    engine: game::MatchEngine<LocalScoreStore>,
    started: Instant,
    wake: Option<Timeout>,
    feedback: Option<Feedback>,
}

impl GameView {
    fn now(&self) -> std::time::Duration {
        self.started.elapsed()
    }

    /// Keeps exactly one browser timeout armed for the engine's nearest deadline.
    fn schedule_wake(&mut self, ctx: &Context<Self>) {
        self.wake = self.engine.time_until_next_timer().map(|delay| {
            let link = ctx.link().clone();
            Timeout::new(timeout_millis(delay), move || link.send_message(Msg::Tick))
        });
    }

    fn select_card(&mut self, id: game::CardId) -> bool {
        use game::SelectOutcome::*;

        let outcome = self.engine.select_card(id);
        match outcome {
            Matched | Completed => log::debug!("match, moves: {}", self.engine.moves()),
            Mismatched => log::debug!("mismatch on card {}", id),
            Flipped | NoChange => {}
        }
        if outcome.has_update() {
            self.feedback = Feedback::for_outcome(outcome);
            if let Some(feedback) = self.feedback {
                feedback.vibrate();
            }
        }
        outcome.has_update()
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let seed = ctx.props().seed.unwrap_or_else(js_random_seed);
        let engine = game::MatchEngine::new(game::EngineConfig::default(), LocalScoreStore, seed);
        log::info!("best score: {:?}", engine.best_score());

        Self {
            engine,
            started: Instant::now(),
            wake: None,
            feedback: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let ticked = self.engine.advance_to(self.now()).has_update();
        if ticked {
            self.feedback = None;
        }
        let updated = match msg {
            SelectCard(id) => self.select_card(id),
            Tick => false,
            NewGame => {
                self.engine.reset();
                self.feedback = None;
                true
            }
        };

        self.schedule_wake(ctx);
        ticked || updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let snapshot = self.engine.snapshot();
        let locked = !self.engine.phase().accepts_selection();
        let moves = format_for_counter(snapshot.moves);
        let best = snapshot
            .best_score
            .map_or_else(|| "---".to_string(), format_for_counter);

        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            NewGame
        });
        let cb_select = ctx.link().callback(SelectCard);

        html! {
            <div class="memo-bits">
                <header>
                    <h1>{"🧠 Memo Bits"}</h1>
                    <small>{"Find all matching pairs!"}</small>
                </header>
                <nav>
                    <aside title="Moves">{moves}</aside>
                    <span><button class="new-game" onclick={cb_new_game.clone()}>{"New Game"}</button></span>
                    <aside title="Best">{best}</aside>
                </nav>
                <section class={classes!(
                    "board",
                    snapshot.is_checking.then_some("checking"),
                    self.feedback.map(Feedback::class),
                )}>
                    {
                        for snapshot.cards.iter().map(|card| html! {
                            <CardView
                                key={card.id}
                                card={card.clone()}
                                {locked}
                                callback={cb_select.clone()}
                            />
                        })
                    }
                </section>
                if snapshot.is_won {
                    <WinDialog
                        moves={snapshot.moves}
                        best_score={snapshot.best_score}
                        is_new_record={snapshot.is_new_record}
                        on_play_again={cb_new_game}
                    />
                }
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        if self.wake.take().is_some() {
            log::debug!("dropped pending engine wake-up");
        }
    }
}
