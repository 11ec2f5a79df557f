use chrono::Utc;
use ratatui::layout::Rect;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use crate::config::Config;
use crate::data::{self, Direction, Lead, Message, Order, OrderStatus};
use crate::draft::{self, DraftError, OrderDraft};
use crate::table::{format_money, RowAction};
use crate::views::{self, Intent, Pane, View, ViewPane};

/// Most recent interactions kept for the status line
const ACTIVITY_LIMIT: usize = 100;

/// What a prompt submission creates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    NewOrder,
    Reply { to: String, subject: String },
}

impl PromptKind {
    pub fn title(&self) -> String {
        match self {
            PromptKind::NewOrder => "New order (customer, amount)".to_string(),
            PromptKind::Reply { to, .. } => format!("Reply to {to}"),
        }
    }
}

/// Popup layered over the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    /// Row action menu for the selected row
    Menu { actions: Vec<RowAction>, selected: usize },
    /// Read-only field listing
    Detail { title: String, fields: Vec<(String, String)> },
    /// Single-line input; `error` holds the last rejected submission
    Prompt { kind: PromptKind, input: String, error: Option<String> },
}

/// Application state
pub struct App {
    view: View,
    leads: Pane<Lead>,
    orders: Pane<Order>,
    inbox: Pane<Message>,
    overlay: Overlay,
    intents: UnboundedReceiver<Intent>,
    /// Interaction log, newest last
    activity: Vec<String>,
    config: Config,
    /// Where the table was last drawn, for mouse hit-testing
    table_area: Rect,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self::with_data(
            config,
            data::sample_leads(),
            data::sample_orders(),
            data::sample_messages(),
        )
    }

    pub fn with_data(
        config: Config,
        leads: Vec<Lead>,
        orders: Vec<Order>,
        messages: Vec<Message>,
    ) -> Self {
        let (tx, intents) = unbounded_channel();
        let mut app = Self {
            view: config.behavior.default_view,
            leads: views::leads_pane(leads, Some(&tx)),
            orders: views::orders_pane(orders, Some(&tx)),
            inbox: views::inbox_pane(messages, Some(&tx)),
            overlay: Overlay::None,
            intents,
            activity: Vec::new(),
            config,
            table_area: Rect::default(),
            should_quit: false,
        };

        // Senders live on inside the table callbacks
        drop(tx);

        app.apply_configured_sort();
        app
    }

    fn apply_configured_sort(&mut self) {
        for view in View::ALL {
            let Some(spec) = self.config.sort.for_view(view) else {
                continue;
            };
            let applied = match view {
                View::Leads => self.leads.table.set_sort(&spec.key, spec.direction),
                View::Orders => self.orders.table.set_sort(&spec.key, spec.direction),
                View::Inbox => self.inbox.table.set_sort(&spec.key, spec.direction),
            };
            if !applied {
                tracing::warn!("Column {:?} is not sortable in {}", spec.key, view);
            }
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn set_view(&mut self, view: View) {
        if self.view != view {
            tracing::debug!("Switching to {view}");
            self.view = view;
            self.overlay = Overlay::None;
        }
    }

    pub fn next_view(&mut self) {
        self.set_view(self.view.next());
    }

    pub fn previous_view(&mut self) {
        self.set_view(self.view.previous());
    }

    /// The active view's pane
    pub fn pane(&mut self) -> &mut dyn ViewPane {
        match self.view {
            View::Leads => &mut self.leads,
            View::Orders => &mut self.orders,
            View::Inbox => &mut self.inbox,
        }
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads.rows
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders.rows
    }

    pub fn messages(&self) -> &[Message] {
        &self.inbox.rows
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut Overlay {
        &mut self.overlay
    }

    pub fn close_overlay(&mut self) {
        self.overlay = Overlay::None;
    }

    pub fn table_area(&self) -> Rect {
        self.table_area
    }

    pub fn set_table_area(&mut self, area: Rect) {
        self.table_area = area;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn last_activity(&self) -> Option<&str> {
        self.activity.last().map(String::as_str)
    }

    /// Record an interaction in the log and the activity list
    fn log(&mut self, message: String) {
        tracing::info!(view = %self.view, "{message}");
        self.activity.push(message);
        if self.activity.len() > ACTIVITY_LIMIT {
            let excess = self.activity.len() - ACTIVITY_LIMIT;
            self.activity.drain(..excess);
        }
    }

    // Filtering

    pub fn is_filtering(&mut self) -> bool {
        self.pane().filter().is_editing()
    }

    pub fn start_filter(&mut self) {
        self.pane().filter_mut().start();
    }

    pub fn push_filter_char(&mut self, c: char) {
        let pane = self.pane();
        pane.filter_mut().push(c);
        pane.refresh();
    }

    pub fn pop_filter_char(&mut self) {
        let pane = self.pane();
        pane.filter_mut().pop();
        pane.refresh();
    }

    pub fn clear_filter(&mut self) {
        let pane = self.pane();
        pane.filter_mut().clear();
        pane.refresh();
    }

    pub fn finish_filter(&mut self) {
        self.pane().filter_mut().stop();
    }

    // Sorting

    /// Toggle sort on a column of the active view
    pub fn toggle_sort(&mut self, key: &str) -> bool {
        self.pane().toggle_sort(key)
    }

    /// Back to input order
    pub fn clear_sort(&mut self) {
        self.pane().clear_sort();
        tracing::debug!("Cleared sort on {}", self.view);
    }

    /// Sort by the `n`th sortable column (1-based, as typed on the keyboard)
    pub fn toggle_sort_nth(&mut self, n: usize) -> bool {
        let keys = self.pane().sortable_keys();
        match n.checked_sub(1).and_then(|i| keys.get(i)) {
            Some(key) => {
                let key = key.clone();
                self.toggle_sort(&key)
            }
            None => false,
        }
    }

    // Row actions

    /// Run `action` on the selected row and apply whatever it asked for
    pub fn dispatch(&mut self, action: RowAction) {
        if !self.pane().dispatch_selected(action) {
            tracing::debug!("No {:?} handler for current selection", action);
        }
        self.drain_intents();
    }

    /// Open the action menu for the selected row
    pub fn open_menu(&mut self) {
        let pane = self.pane();
        if pane.visible_len() == 0 {
            return;
        }
        let actions = pane.menu();
        if !actions.is_empty() {
            self.overlay = Overlay::Menu { actions, selected: 0 };
        }
    }

    /// Apply every intent the callbacks queued
    pub fn drain_intents(&mut self) {
        while let Ok(intent) = self.intents.try_recv() {
            self.handle_intent(intent);
        }
    }

    fn handle_intent(&mut self, intent: Intent) {
        let Intent { view, action, id } = intent;
        match (view, action) {
            (_, RowAction::RowClick) => self.log(format!("Opened {} #{id}", view.noun())),
            (View::Leads, RowAction::View) => self.show_lead(id),
            (View::Leads, RowAction::Edit) => self.advance_lead(id),
            (View::Leads, RowAction::Delete) => self.delete_lead(id),
            (View::Orders, RowAction::View) => self.show_order(id),
            (View::Orders, RowAction::Edit) => self.advance_order(id),
            (View::Orders, RowAction::Delete) => self.delete_order(id),
            (View::Inbox, RowAction::View) => self.show_message(id),
            (View::Inbox, RowAction::Delete) => self.delete_message(id),
            (View::Inbox, RowAction::Edit) => tracing::warn!("Messages cannot be edited"),
        }
    }

    fn show_lead(&mut self, id: u32) {
        let Some(lead) = self.leads.rows.iter().find(|l| l.id == id) else {
            return;
        };
        let fields = vec![
            ("Name".to_string(), lead.name.clone()),
            ("Company".to_string(), lead.company.clone()),
            ("Email".to_string(), lead.email.clone()),
            ("Stage".to_string(), lead.stage.to_string()),
            ("Value".to_string(), format_money(lead.value)),
            ("Owner".to_string(), lead.owner.clone().unwrap_or_default()),
            ("Created".to_string(), lead.created.to_string()),
        ];
        self.overlay = Overlay::Detail {
            title: format!("Lead #{id}"),
            fields,
        };
        self.log(format!("Viewed lead #{id}"));
    }

    fn advance_lead(&mut self, id: u32) {
        let Some(lead) = self.leads.rows.iter_mut().find(|l| l.id == id) else {
            return;
        };
        let from = lead.stage;
        if from.is_closed() {
            let message = format!("Lead #{id} is already {from}");
            self.log(message);
            return;
        }
        lead.stage = from.advanced();
        let message = format!("Lead #{id} moved {from} → {}", lead.stage);
        self.log(message);
    }

    fn delete_lead(&mut self, id: u32) {
        let before = self.leads.rows.len();
        self.leads.rows.retain(|l| l.id != id);
        if self.leads.rows.len() < before {
            self.leads.refresh();
            self.log(format!("Deleted lead #{id}"));
        }
    }

    fn show_order(&mut self, id: u32) {
        let Some(order) = self.orders.rows.iter().find(|o| o.id == id) else {
            return;
        };
        let fields = vec![
            ("Customer".to_string(), order.customer.clone()),
            ("Status".to_string(), order.status.to_string()),
            ("Items".to_string(), order.items.to_string()),
            ("Total".to_string(), format_money(order.total)),
            ("Placed".to_string(), order.placed.to_string()),
        ];
        self.overlay = Overlay::Detail {
            title: format!("Order #{id}"),
            fields,
        };
        self.log(format!("Viewed order #{id}"));
    }

    fn advance_order(&mut self, id: u32) {
        let Some(order) = self.orders.rows.iter_mut().find(|o| o.id == id) else {
            return;
        };
        let from = order.status;
        order.status = from.advanced();
        let message = if order.status == from {
            format!("Order #{id} is already {from}")
        } else {
            format!("Order #{id} moved {from} → {}", order.status)
        };
        self.log(message);
    }

    fn delete_order(&mut self, id: u32) {
        let before = self.orders.rows.len();
        self.orders.rows.retain(|o| o.id != id);
        if self.orders.rows.len() < before {
            self.orders.refresh();
            self.log(format!("Deleted order #{id}"));
        }
    }

    fn show_message(&mut self, id: u32) {
        let Some(message) = self.inbox.rows.iter_mut().find(|m| m.id == id) else {
            return;
        };
        message.read = true;
        let label = match message.direction {
            Direction::Incoming => "From",
            Direction::Outgoing => "To",
        };
        let fields = vec![
            (label.to_string(), message.contact.clone()),
            ("Subject".to_string(), message.subject.clone()),
            ("Date".to_string(), message.received.to_string()),
            (String::new(), message.body.clone()),
        ];
        self.overlay = Overlay::Detail {
            title: format!("Message #{id}"),
            fields,
        };
        self.log(format!("Read message #{id}"));
    }

    fn delete_message(&mut self, id: u32) {
        let before = self.inbox.rows.len();
        self.inbox.rows.retain(|m| m.id != id);
        if self.inbox.rows.len() < before {
            self.inbox.refresh();
            self.log(format!("Deleted message #{id}"));
        }
    }

    // Prompts

    /// Open the creation prompt for the active view, if it has one
    pub fn open_prompt(&mut self) {
        let kind = match self.view {
            View::Orders => PromptKind::NewOrder,
            View::Inbox => match self.inbox.selected_row() {
                Some(m) => PromptKind::Reply {
                    to: m.contact.clone(),
                    subject: m.subject.clone(),
                },
                None => return,
            },
            View::Leads => return,
        };
        self.overlay = Overlay::Prompt {
            kind,
            input: String::new(),
            error: None,
        };
    }

    /// Submit the open prompt; on error the prompt stays open
    pub fn submit_prompt(&mut self) -> Result<(), DraftError> {
        let Overlay::Prompt { kind, input, .. } = &self.overlay else {
            return Ok(());
        };
        let (kind, input) = (kind.clone(), input.clone());
        let result = match kind {
            PromptKind::NewOrder => OrderDraft::parse(&input).map(|d| self.create_order(d)),
            PromptKind::Reply { to, subject } => {
                draft::reply_body(&input).map(|body| self.send_reply(to, &subject, body))
            }
        };
        match &result {
            Ok(()) => self.overlay = Overlay::None,
            Err(e) => {
                tracing::warn!("Rejected prompt input {input:?}: {e}");
                if let Overlay::Prompt { error, .. } = &mut self.overlay {
                    *error = Some(e.to_string());
                }
            }
        }
        result
    }

    fn create_order(&mut self, draft: OrderDraft) {
        let id = self.orders.rows.iter().map(|o| o.id).max().unwrap_or(5000) + 1;
        self.orders.rows.push(Order {
            id,
            customer: draft.customer,
            status: OrderStatus::Pending,
            total: draft.total,
            items: 1,
            placed: Utc::now().date_naive(),
        });
        self.orders.refresh();
        self.log(format!("Created order #{id} for {}", format_money(draft.total)));
    }

    fn send_reply(&mut self, to: String, subject: &str, body: String) {
        let id = self.inbox.rows.iter().map(|m| m.id).max().unwrap_or(9000) + 1;
        self.inbox.rows.push(Message {
            id,
            contact: to.clone(),
            subject: draft::reply_subject(subject),
            body,
            received: Utc::now().date_naive(),
            read: true,
            direction: Direction::Outgoing,
        });
        self.inbox.refresh();
        self.log(format!("Sent reply to {to}"));
    }
}
