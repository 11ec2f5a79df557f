//! Sample CRM records and the built-in datasets.
//!
//! Everything here is static seed data. The console copies it into
//! per-view state on startup and never writes it anywhere.

use chrono::NaiveDate;
use std::fmt;

use crate::table::{CellValue, Row};

/// Text used for fuzzy filtering
pub trait Searchable {
    fn search_text(&self) -> String;
}

/// Records addressed by a numeric id
pub trait Entity {
    fn id(&self) -> u32;
}

/// Pipeline stage of a lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    New,
    Contacted,
    Qualified,
    Proposal,
    Won,
    Lost,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::New,
        Stage::Contacted,
        Stage::Qualified,
        Stage::Proposal,
        Stage::Won,
        Stage::Lost,
    ];

    /// Next stage along the pipeline; closed stages stay put
    pub fn advanced(self) -> Self {
        match self {
            Stage::New => Stage::Contacted,
            Stage::Contacted => Stage::Qualified,
            Stage::Qualified => Stage::Proposal,
            Stage::Proposal => Stage::Won,
            Stage::Won => Stage::Won,
            Stage::Lost => Stage::Lost,
        }
    }

    pub fn is_closed(self) -> bool {
        matches!(self, Stage::Won | Stage::Lost)
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::New => "New",
            Stage::Contacted => "Contacted",
            Stage::Qualified => "Qualified",
            Stage::Proposal => "Proposal",
            Stage::Won => "Won",
            Stage::Lost => "Lost",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lead {
    pub id: u32,
    pub name: String,
    pub company: String,
    pub email: String,
    pub stage: Stage,
    /// Deal value in cents
    pub value: i64,
    pub owner: Option<String>,
    pub created: NaiveDate,
}

impl Row for Lead {
    fn value(&self, key: &str) -> CellValue {
        match key {
            "id" => self.id.into(),
            "name" => CellValue::text(&self.name),
            "company" => CellValue::text(&self.company),
            "email" => CellValue::text(&self.email),
            // Pipeline position sorts better than the stage name
            "stage" => CellValue::Number(self.stage as u8 as f64),
            "value" => CellValue::Money(self.value),
            "owner" => self.owner.as_deref().into(),
            "created" => self.created.into(),
            _ => CellValue::Empty,
        }
    }
}

impl Entity for Lead {
    fn id(&self) -> u32 {
        self.id
    }
}

impl Searchable for Lead {
    fn search_text(&self) -> String {
        let mut parts = vec![
            self.name.as_str(),
            self.company.as_str(),
            self.email.as_str(),
            self.stage.label(),
        ];
        if let Some(ref owner) = self.owner {
            parts.push(owner.as_str());
        }
        parts.join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Paid,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Paid => "Paid",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Next status in fulfilment; delivered and cancelled orders stay put
    pub fn advanced(self) -> Self {
        match self {
            OrderStatus::Pending => OrderStatus::Paid,
            OrderStatus::Paid => OrderStatus::Shipped,
            OrderStatus::Shipped => OrderStatus::Delivered,
            OrderStatus::Delivered => OrderStatus::Delivered,
            OrderStatus::Cancelled => OrderStatus::Cancelled,
        }
    }

    /// Counts toward realised revenue
    pub fn is_revenue(self) -> bool {
        matches!(self, OrderStatus::Shipped | OrderStatus::Delivered)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: u32,
    pub customer: String,
    pub status: OrderStatus,
    /// Order total in cents
    pub total: i64,
    pub items: u32,
    pub placed: NaiveDate,
}

impl Row for Order {
    fn value(&self, key: &str) -> CellValue {
        match key {
            "id" => self.id.into(),
            "customer" => CellValue::text(&self.customer),
            "status" => self.status.label().into(),
            "total" => CellValue::Money(self.total),
            "items" => self.items.into(),
            "placed" => self.placed.into(),
            _ => CellValue::Empty,
        }
    }
}

impl Entity for Order {
    fn id(&self) -> u32 {
        self.id
    }
}

impl Searchable for Order {
    fn search_text(&self) -> String {
        format!("#{} {} {}", self.id, self.customer, self.status.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Incoming,
    Outgoing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: u32,
    /// Sender for incoming messages, recipient for outgoing ones
    pub contact: String,
    pub subject: String,
    pub body: String,
    pub received: NaiveDate,
    pub read: bool,
    pub direction: Direction,
}

impl Row for Message {
    fn value(&self, key: &str) -> CellValue {
        match key {
            "id" => self.id.into(),
            "contact" => CellValue::text(&self.contact),
            "subject" => CellValue::text(&self.subject),
            "received" => self.received.into(),
            "read" => self.read.into(),
            "direction" => match self.direction {
                Direction::Incoming => "in".into(),
                Direction::Outgoing => "out".into(),
            },
            _ => CellValue::Empty,
        }
    }
}

impl Entity for Message {
    fn id(&self) -> u32 {
        self.id
    }
}

impl Searchable for Message {
    fn search_text(&self) -> String {
        format!("{} {} {}", self.contact, self.subject, self.body)
    }
}

/// Calendar date for seed data; an out-of-range date falls back to the epoch
fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Seed lead; an empty `owner` means unassigned
fn lead(
    id: u32,
    name: &str,
    company: &str,
    stage: Stage,
    value: i64,
    owner: &str,
    created: NaiveDate,
) -> Lead {
    let email = format!(
        "{}@{}.example",
        name.split_whitespace().next().unwrap_or(name).to_lowercase(),
        company.split_whitespace().next().unwrap_or(company).to_lowercase()
    );
    Lead {
        id,
        name: name.to_string(),
        company: company.to_string(),
        email,
        stage,
        value,
        owner: (!owner.is_empty()).then(|| owner.to_string()),
        created,
    }
}

/// id, name, company, stage, value, owner, created
type LeadSeed = (u32, &'static str, &'static str, Stage, i64, &'static str, (i32, u32, u32));

const LEADS: [LeadSeed; 10] = [
    (101, "Maya Chen", "Northwind Traders", Stage::Qualified, 1_250_000, "Jordan", (2024, 2, 12)),
    (102, "Liam Ortiz", "Bluefin Logistics", Stage::New, 480_000, "", (2024, 3, 1)),
    (103, "Ava Patel", "Helios Energy", Stage::Proposal, 3_400_000, "Sam", (2024, 1, 22)),
    (104, "Noah Kim", "Granite Foods", Stage::Contacted, 720_000, "Jordan", (2024, 2, 28)),
    (105, "Sofia Rossi", "Lumen Health", Stage::Won, 2_150_000, "Alex", (2023, 12, 5)),
    (106, "Ethan Brooks", "Cobalt Robotics", Stage::Lost, 960_000, "Sam", (2023, 11, 18)),
    (107, "Zara Ahmed", "Juniper Retail", Stage::New, 310_000, "", (2024, 3, 9)),
    (108, "Lucas Meyer", "Atlas Freight", Stage::Qualified, 1_780_000, "Alex", (2024, 2, 3)),
    (109, "Emma Novak", "Summit Banking", Stage::Proposal, 5_200_000, "Jordan", (2024, 1, 15)),
    (110, "Omar Haddad", "Redwood Media", Stage::Contacted, 640_000, "", (2024, 3, 4)),
];

pub fn sample_leads() -> Vec<Lead> {
    LEADS
        .iter()
        .map(|&(id, name, company, stage, value, owner, (y, m, d))| {
            lead(id, name, company, stage, value, owner, day(y, m, d))
        })
        .collect()
}

fn order(
    id: u32,
    customer: &str,
    status: OrderStatus,
    total: i64,
    items: u32,
    placed: NaiveDate,
) -> Order {
    Order {
        id,
        customer: customer.to_string(),
        status,
        total,
        items,
        placed,
    }
}

pub fn sample_orders() -> Vec<Order> {
    vec![
        order(5001, "Lumen Health", OrderStatus::Delivered, 2_150_000, 12, day(2024, 1, 10)),
        order(5002, "Northwind Traders", OrderStatus::Paid, 348_900, 4, day(2024, 2, 20)),
        order(5003, "Granite Foods", OrderStatus::Pending, 99_500, 2, day(2024, 3, 6)),
        order(5004, "Atlas Freight", OrderStatus::Shipped, 1_120_000, 8, day(2024, 2, 27)),
        order(5005, "Juniper Retail", OrderStatus::Cancelled, 45_000, 1, day(2024, 2, 14)),
        order(5006, "Helios Energy", OrderStatus::Delivered, 780_250, 5, day(2024, 1, 30)),
        order(5007, "Bluefin Logistics", OrderStatus::Pending, 212_000, 3, day(2024, 3, 8)),
    ]
}

fn message(
    id: u32,
    contact: &str,
    subject: &str,
    body: &str,
    received: NaiveDate,
    read: bool,
) -> Message {
    Message {
        id,
        contact: contact.to_string(),
        subject: subject.to_string(),
        body: body.to_string(),
        received,
        read,
        direction: Direction::Incoming,
    }
}

pub fn sample_messages() -> Vec<Message> {
    vec![
        message(
            9001,
            "Maya Chen",
            "Pricing for Q2 rollout",
            "Could you send updated pricing for the 40-seat tier before Friday?",
            day(2024, 3, 7),
            false,
        ),
        message(
            9002,
            "Ava Patel",
            "Re: Proposal draft",
            "Legal has a few comments on section 4, otherwise we are close.",
            day(2024, 3, 6),
            true,
        ),
        message(
            9003,
            "Liam Ortiz",
            "Intro call",
            "Happy to chat next week. Tuesday afternoon works for us.",
            day(2024, 3, 8),
            false,
        ),
        message(
            9004,
            "Lucas Meyer",
            "Shipment tracking",
            "Order 5004 shows shipped but no tracking number yet.",
            day(2024, 3, 2),
            true,
        ),
        message(
            9005,
            "Emma Novak",
            "Security questionnaire",
            "Attached is our vendor security questionnaire. Due end of month.",
            day(2024, 3, 5),
            false,
        ),
    ]
}
