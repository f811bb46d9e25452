use crate::friend::{BalanceStatus, FriendId};
use crate::ids::{IdGenerator, UuidGenerator};
use crate::split::Payer;
use crate::store::FriendLedgerStore;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Friends,
    AddFriend,
    SplitBill,
}

// ============================================================================
// FORMS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddField {
    Name,
    ImageUrl,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddFriendForm {
    pub name: String,
    pub image_url: String,
    pub field: AddField,
}

impl AddFriendForm {
    fn new() -> Self {
        AddFriendForm {
            name: String::new(),
            image_url: String::new(),
            field: AddField::Name,
        }
    }

    fn current_mut(&mut self) -> &mut String {
        match self.field {
            AddField::Name => &mut self.name,
            AddField::ImageUrl => &mut self.image_url,
        }
    }

    fn next_field(&mut self) {
        self.field = match self.field {
            AddField::Name => AddField::ImageUrl,
            AddField::ImageUrl => AddField::Name,
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitField {
    Bill,
    UserExpense,
    Payer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplitBillForm {
    pub friend_id: Option<FriendId>,
    pub bill: String,
    pub user_expense: String,
    pub paid_by: Payer,
    pub field: SplitField,
}

impl SplitBillForm {
    fn new(friend_id: Option<FriendId>) -> Self {
        SplitBillForm {
            friend_id,
            bill: String::new(),
            user_expense: String::new(),
            paid_by: Payer::User,
            field: SplitField::Bill,
        }
    }

    fn next_field(&mut self) {
        self.field = match self.field {
            SplitField::Bill => SplitField::UserExpense,
            SplitField::UserExpense => SplitField::Payer,
            SplitField::Payer => SplitField::Bill,
        };
    }

    pub fn bill_value(&self) -> Option<f64> {
        self.bill.parse().ok()
    }

    pub fn user_expense_value(&self) -> Option<f64> {
        self.user_expense.parse().ok()
    }

    /// Derived from the two inputs, never typed
    pub fn friend_expense(&self) -> Option<f64> {
        Some(self.bill_value()? - self.user_expense_value()?)
    }

    /// Numeric input only; an expense larger than the bill is not accepted
    fn push_char(&mut self, c: char) {
        if !(c.is_ascii_digit() || c == '.') {
            return;
        }
        match self.field {
            SplitField::Bill => {
                if c == '.' && self.bill.contains('.') {
                    return;
                }
                self.bill.push(c);
            }
            SplitField::UserExpense => {
                if c == '.' && self.user_expense.contains('.') {
                    return;
                }
                let mut candidate = self.user_expense.clone();
                candidate.push(c);
                if let (Ok(expense), Some(bill)) = (candidate.parse::<f64>(), self.bill_value()) {
                    if expense > bill {
                        return;
                    }
                }
                self.user_expense = candidate;
            }
            SplitField::Payer => {}
        }
    }

    fn pop_char(&mut self) {
        match self.field {
            SplitField::Bill => {
                self.bill.pop();
            }
            SplitField::UserExpense => {
                self.user_expense.pop();
            }
            SplitField::Payer => {}
        }
    }
}

// ============================================================================
// APP
// ============================================================================

pub struct App {
    pub store: FriendLedgerStore,
    pub list_state: ListState,
    pub focus: Focus,
    pub add_form: AddFriendForm,
    pub split_form: SplitBillForm,
    pub status: Option<String>,
    pub should_quit: bool,
    ids: Box<dyn IdGenerator>,
}

impl App {
    pub fn new(store: FriendLedgerStore) -> Self {
        Self::with_ids(store, Box::new(UuidGenerator))
    }

    pub fn with_ids(store: FriendLedgerStore, ids: Box<dyn IdGenerator>) -> Self {
        let mut list_state = ListState::default();
        if !store.state().friends().is_empty() {
            list_state.select(Some(0));
        }

        Self {
            store,
            list_state,
            focus: Focus::Friends,
            add_form: AddFriendForm::new(),
            split_form: SplitBillForm::new(None),
            status: None,
            should_quit: false,
            ids,
        }
    }

    /// Friend under the list cursor
    pub fn cursor_friend_id(&self) -> Option<FriendId> {
        self.list_state
            .selected()
            .and_then(|i| self.store.state().friends().get(i))
            .map(|f| f.id().clone())
    }

    pub fn next(&mut self) {
        let len = self.store.state().friends().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.store.state().friends().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn toggle_add_panel(&mut self) {
        let open = self.store.toggle_add_panel();
        self.focus = if open { Focus::AddFriend } else { Focus::Friends };
        self.status = None;
    }

    pub fn select_cursor_friend(&mut self) {
        let Some(id) = self.cursor_friend_id() else {
            return;
        };

        match self.store.select_friend(&id) {
            Ok(Some(selected)) => {
                if self.split_form.friend_id.as_ref() != Some(&selected) {
                    self.split_form = SplitBillForm::new(Some(selected));
                }
                self.focus = Focus::SplitBill;
                self.status = None;
            }
            Ok(None) => {
                self.focus = Focus::Friends;
                self.status = None;
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    pub fn submit_add_friend(&mut self) {
        let result = self.store.add_friend(
            &self.add_form.name,
            &self.add_form.image_url,
            self.ids.as_mut(),
        );

        match result {
            Ok(_) => {
                self.add_form = AddFriendForm::new();
                self.focus = Focus::Friends;
                let last = self.store.state().friends().len() - 1;
                self.list_state.select(Some(last));
                self.status = self.store.last_event().map(|e| e.describe());
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    pub fn submit_split_bill(&mut self) {
        let (Some(bill), Some(user_expense)) =
            (self.split_form.bill_value(), self.split_form.user_expense_value())
        else {
            self.status = Some("Enter the bill value and your expense".to_string());
            return;
        };

        match self.store.split_bill(self.split_form.paid_by, bill, user_expense) {
            Ok(_) => {
                self.split_form = SplitBillForm::new(None);
                self.focus = Focus::Friends;
                self.status = self.store.last_event().map(|e| e.describe());
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    /// Route one key press according to the focused pane
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.focus {
            Focus::Friends => self.handle_friends_key(key),
            Focus::AddFriend => self.handle_add_key(key),
            Focus::SplitBill => self.handle_split_key(key),
        }
    }

    fn handle_friends_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Enter | KeyCode::Char(' ') => self.select_cursor_friend(),
            KeyCode::Char('a') => self.toggle_add_panel(),
            KeyCode::Tab => {
                let state = self.store.state();
                if state.is_add_panel_open() {
                    self.focus = Focus::AddFriend;
                } else if state.selected_friend_id().is_some() {
                    self.focus = Focus::SplitBill;
                }
            }
            _ => {}
        }
    }

    fn handle_add_key(&mut self, key: KeyEvent) {
        match key.code {
            // Closing the form goes through the store so the selection rules hold
            KeyCode::Esc => self.toggle_add_panel(),
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => self.add_form.next_field(),
            KeyCode::Enter => self.submit_add_friend(),
            KeyCode::Backspace => {
                self.add_form.current_mut().pop();
            }
            KeyCode::Char(c) => self.add_form.current_mut().push(c),
            _ => {}
        }
    }

    fn handle_split_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.focus = Focus::Friends,
            KeyCode::Tab | KeyCode::Down => self.split_form.next_field(),
            KeyCode::Enter => self.submit_split_bill(),
            KeyCode::Backspace => self.split_form.pop_char(),
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
                if self.split_form.field == SplitField::Payer =>
            {
                self.split_form.paid_by = self.split_form.paid_by.toggle();
            }
            KeyCode::Char(c) => self.split_form.push_char(c),
            _ => {}
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "ui loop failed");
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

// ============================================================================
// RENDERING
// ============================================================================

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(6)])
        .split(columns[0]);

    render_friends(f, sidebar[0], app);
    render_add_friend(f, sidebar[1], app);
    render_split_bill(f, columns[1], app);
    render_status_bar(f, chunks[1], app);
}

fn focus_border(app: &App, pane: Focus) -> Style {
    if app.focus == pane {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    }
}

fn balance_color(status: BalanceStatus) -> Color {
    match status {
        BalanceStatus::YouOwe => Color::Red,
        BalanceStatus::OwesYou => Color::Green,
        BalanceStatus::Even => Color::Gray,
    }
}

fn render_friends(f: &mut Frame, area: Rect, app: &mut App) {
    let state = app.store.state();

    let items: Vec<ListItem> = state
        .friends()
        .iter()
        .map(|friend| {
            let selected = state.is_selected(friend.id());
            let name_style = if selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };

            let lines = vec![
                Line::from(vec![
                    Span::styled(friend.name().to_string(), name_style),
                    Span::raw("  "),
                    Span::styled(
                        if selected { "[Close]" } else { "[Select]" },
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::from(Span::styled(
                    friend.balance_label(),
                    Style::default().fg(balance_color(friend.status())),
                )),
            ];
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_border(app, Focus::Friends))
                .title(" Friends "),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("→ ");

    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn input_line<'a>(label: &'a str, value: &'a str, active: bool) -> Line<'a> {
    let label_style = if active {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let mut spans = vec![Span::styled(label, label_style), Span::raw(value)];
    if active {
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}

fn render_add_friend(f: &mut Frame, area: Rect, app: &App) {
    let form = &app.add_form;
    let content = if app.store.state().is_add_panel_open() {
        let active = app.focus == Focus::AddFriend;
        vec![
            input_line(" Friend name: ", &form.name, active && form.field == AddField::Name),
            input_line(
                " Image URL:   ",
                &form.image_url,
                active && form.field == AddField::ImageUrl,
            ),
            Line::from(Span::styled(
                " Enter add · Esc close",
                Style::default().fg(Color::DarkGray),
            )),
        ]
    } else {
        vec![Line::from(vec![
            Span::raw(" Press "),
            Span::styled("a", Style::default().fg(Color::Yellow)),
            Span::raw(" to add a friend"),
        ])]
    };

    let panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_border(app, Focus::AddFriend))
            .title(" Add Friend "),
    );
    f.render_widget(panel, area);
}

fn render_split_bill(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(app, Focus::SplitBill));

    let Some(friend) = app.store.state().selected_friend() else {
        let empty = Paragraph::new(" Select a friend to split a bill")
            .block(block.title(" Split a Bill "));
        f.render_widget(empty, area);
        return;
    };

    let form = &app.split_form;
    let active = app.focus == Focus::SplitBill;
    let friend_expense = form
        .friend_expense()
        .map(|v| v.to_string())
        .unwrap_or_default();
    let friend_label = format!(" {}'s expense: ", friend.name());
    let payer_name = match form.paid_by {
        Payer::User => "You".to_string(),
        Payer::Friend => friend.name().to_string(),
    };

    let content = vec![
        Line::from(""),
        input_line(" Bill value:   ", &form.bill, active && form.field == SplitField::Bill),
        Line::from(""),
        input_line(
            " Your expense: ",
            &form.user_expense,
            active && form.field == SplitField::UserExpense,
        ),
        Line::from(""),
        Line::from(vec![
            Span::styled(friend_label, Style::default().fg(Color::Cyan)),
            Span::styled(friend_expense, Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
        input_line(
            " Who is paying the bill? ",
            &payer_name,
            active && form.field == SplitField::Payer,
        ),
        Line::from(""),
        Line::from(Span::styled(
            " Tab next field · ←/→ change payer · Enter split · Esc back",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let title = format!(" Split a bill with {} ", friend.name());
    let panel = Paragraph::new(content).block(block.title(title));
    f.render_widget(panel, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let state = app.store.state();
    let mut status_spans = vec![Span::styled(
        format!(" Friends: {} ", state.friends().len()),
        Style::default().fg(Color::Cyan),
    )];

    if let Some(message) = &app.status {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(message.clone(), Style::default().fg(Color::Green)));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Select | "));
    status_spans.push(Span::styled("a", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Add | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use ratatui::backend::TestBackend;

    fn app() -> App {
        App::with_ids(FriendLedgerStore::new(), Box::new(SequentialIds::new("D")))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_cursor_wraps() {
        let mut app = app();
        assert_eq!(app.list_state.selected(), Some(0));

        press(&mut app, KeyCode::Up);
        assert_eq!(app.list_state.selected(), Some(2));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn test_split_bill_flow() {
        let mut app = app();

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focus, Focus::SplitBill);
        assert_eq!(app.store.state().selected_friend().unwrap().name(), "Clark");

        type_text(&mut app, "100");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "40");
        assert_eq!(app.split_form.friend_expense(), Some(60.0));

        press(&mut app, KeyCode::Enter);
        let clark = &app.store.state().friends()[0];
        assert_eq!(clark.balance(), 53.0);
        assert!(app.store.state().selected_friend_id().is_none());
        assert_eq!(app.focus, Focus::Friends);
    }

    #[test]
    fn test_friend_pays() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        type_text(&mut app, "50");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "20");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.split_form.paid_by, Payer::Friend);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.store.state().friends()[1].balance(), 0.0);
    }

    #[test]
    fn test_user_expense_cannot_exceed_bill() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);

        type_text(&mut app, "10");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "5x0");
        // "50" would exceed the bill, so the second digit is dropped
        assert_eq!(app.split_form.user_expense, "5");
    }

    #[test]
    fn test_incomplete_split_is_refused() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "10");
        press(&mut app, KeyCode::Enter);

        assert!(app.status.is_some());
        assert_eq!(app.store.state().friends()[0].balance(), -7.0);
        assert!(app.store.state().selected_friend_id().is_some());
    }

    #[test]
    fn test_selecting_other_friend_resets_form() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "10");

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.split_form.bill, "");
        assert_eq!(app.split_form.friend_id, Some(FriendId::from("933372")));
    }

    #[test]
    fn test_add_friend_flow() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.focus, Focus::AddFriend);
        assert!(app.store.state().is_add_panel_open());

        type_text(&mut app, "Dana");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "http://x");
        press(&mut app, KeyCode::Enter);

        let friends = app.store.state().friends();
        assert_eq!(friends.len(), 4);
        assert_eq!(friends[3].id().as_str(), "D1");
        assert!(!app.store.state().is_add_panel_open());
        assert_eq!(app.list_state.selected(), Some(3));
    }

    #[test]
    fn test_add_friend_with_blank_field() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Dana");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.store.state().friends().len(), 3);
        assert!(app.store.state().is_add_panel_open());
        assert!(app.status.as_deref().unwrap().contains("image_url"));
    }

    #[test]
    fn test_q_in_form_is_text() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "q");
        assert!(!app.should_quit);
        assert_eq!(app.add_form.name, "q");

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_render_labels() {
        let mut app = app();
        let text = screen(&mut app);
        assert!(text.contains("You owe Clark $7"));
        assert!(text.contains("Sarah owes you $20"));
        assert!(text.contains("You and Anthony are even"));
        assert!(text.contains("Select a friend to split a bill"));

        press(&mut app, KeyCode::Enter);
        let text = screen(&mut app);
        assert!(text.contains("Split a bill with Clark"));
    }
}
