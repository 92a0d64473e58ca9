use gloo::timers::callback::Interval;
use vistasweeper_core as game;
use game::{CellState, CellValue, Coord2, Difficulty, GameSession, GameState, Outcome};
use yew::prelude::*;

use crate::utils::format_for_counter;

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct GameProps {
    pub seed: u64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Reveal(Coord2),
    Flag(Coord2),
    Tick,
    Restart,
    SetDifficulty(Difficulty),
}

fn face(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Lost => "😵",
        Outcome::Won => "😎",
        Outcome::InProgress => "🙂",
    }
}

fn cell_class(state: CellState) -> Classes {
    match state {
        CellState::Hidden | CellState::Flagged => classes!("ms-cell"),
        CellState::Revealed(CellValue::Mine) => classes!("ms-cell", "revealed", "mine"),
        CellState::Revealed(CellValue::Clear(0)) => classes!("ms-cell", "revealed"),
        CellState::Revealed(CellValue::Clear(count)) => {
            classes!("ms-cell", "revealed", format!("num-{}", count))
        }
    }
}

pub(crate) struct GameView {
    session: GameSession,
    timer: Option<Interval>,
}

impl GameView {
    /// The timer task lives exactly as long as a running game: started on
    /// the first reveal, dropped (cancelled) on win, loss, restart, and
    /// difficulty change.
    fn sync_timer(&mut self, ctx: &Context<Self>) {
        match self.session.state() {
            GameState::InProgress if self.timer.is_none() => {
                let link = ctx.link().clone();
                self.timer = Some(Interval::new(1_000, move || link.send_message(Msg::Tick)));
            }
            GameState::Fresh | GameState::Won | GameState::Lost => {
                self.timer = None;
            }
            GameState::InProgress => {}
        }
    }

    fn view_cell(&self, ctx: &Context<Self>, pos: Coord2) -> Html {
        let state = self.session.cell_at(pos);
        let content = match state {
            CellState::Hidden => Html::default(),
            CellState::Flagged => html! {"🚩"},
            CellState::Revealed(CellValue::Mine) => html! {"💣"},
            CellState::Revealed(CellValue::Clear(0)) => Html::default(),
            CellState::Revealed(CellValue::Clear(count)) => html! { {count.to_string()} },
        };

        let onclick = ctx.link().callback(move |_| Msg::Reveal(pos));
        let oncontextmenu = ctx.link().callback(move |e: MouseEvent| {
            e.prevent_default();
            Msg::Flag(pos)
        });

        html! {
            <div class={cell_class(state)} {onclick} {oncontextmenu}>{content}</div>
        }
    }

    fn view_message(&self) -> Html {
        match self.session.outcome() {
            Outcome::InProgress => Html::default(),
            Outcome::Won => html! {
                <div class="ms-message ms-win">
                    {format!("🎉 You Win! Time: {}s", self.session.elapsed_secs())}
                </div>
            },
            Outcome::Lost => html! {
                <div class="ms-message ms-lose">{"💥 Game Over! Click face to restart."}</div>
            },
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            session: GameSession::with_difficulty(Difficulty::Easy, ctx.props().seed),
            timer: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let updated = match msg {
            Msg::Reveal((row, col)) => self.session.reveal(row, col),
            Msg::Flag((row, col)) => self.session.toggle_flag(row, col),
            Msg::Tick => self.session.tick(),
            Msg::Restart => {
                self.session.reset();
                true
            }
            Msg::SetDifficulty(difficulty) => {
                self.session.change_difficulty(difficulty);
                true
            }
        };
        self.sync_timer(ctx);
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let (rows, cols) = self.session.size();
        let mines_left = format_for_counter(self.session.mines_left() as i32);
        let elapsed = format_for_counter(self.session.elapsed_secs() as i32);

        let on_restart = ctx.link().callback(|_| Msg::Restart);
        let difficulty_button = |label: &'static str, difficulty: Difficulty| {
            let onclick = ctx.link().callback(move |_| Msg::SetDifficulty(difficulty));
            html! {
                <button class="vista-btn ms-btn" {onclick}>{label}</button>
            }
        };

        html! {
            <div class="ms-game" oncontextmenu={Callback::from(|e: MouseEvent| e.prevent_default())}>
                <div class="ms-header">
                    <div class="ms-display mine-counter">{mines_left}</div>
                    <button class="ms-face" onclick={on_restart}>{face(self.session.outcome())}</button>
                    <div class="ms-display timer">{elapsed}</div>
                </div>
                <div
                    class="ms-board"
                    style={format!("grid-template-columns: repeat({}, 25px);", cols)}
                >
                    {
                        for (0..rows)
                            .flat_map(|row| (0..cols).map(move |col| (row, col)))
                            .map(|pos| self.view_cell(ctx, pos))
                    }
                </div>
                {self.view_message()}
                <div class="ms-controls">
                    {difficulty_button("Easy", Difficulty::Easy)}
                    {difficulty_button("Medium", Difficulty::Medium)}
                    {difficulty_button("Hard", Difficulty::Hard)}
                </div>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_tracks_the_outcome() {
        assert_eq!(face(Outcome::InProgress), "🙂");
        assert_eq!(face(Outcome::Won), "😎");
        assert_eq!(face(Outcome::Lost), "😵");
    }

    #[test]
    fn cell_classes_cover_every_visible_state() {
        assert_eq!(cell_class(CellState::Hidden), classes!("ms-cell"));
        assert_eq!(cell_class(CellState::Flagged), classes!("ms-cell"));
        assert_eq!(
            cell_class(CellState::Revealed(CellValue::Clear(0))),
            classes!("ms-cell", "revealed")
        );
        assert_eq!(
            cell_class(CellState::Revealed(CellValue::Clear(3))),
            classes!("ms-cell", "revealed", "num-3")
        );
        assert_eq!(
            cell_class(CellState::Revealed(CellValue::Mine)),
            classes!("ms-cell", "revealed", "mine")
        );
    }
}
