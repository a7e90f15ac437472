use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use log::debug;
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::query::Query;
use crate::record::{next_id, Field, Identified, OptionalField, Record, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TodoStatus {
    Todo,
    InProgress,
    Done,
}

impl TodoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Todo => "todo",
            TodoStatus::InProgress => "in-progress",
            TodoStatus::Done => "done",
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "todo" => Ok(TodoStatus::Todo),
            "in-progress" => Ok(TodoStatus::InProgress),
            "done" => Ok(TodoStatus::Done),
            other => Err(anyhow::anyhow!("Unknown todo status `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: u64,
    pub title: String,
    pub status: TodoStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_on: Option<NaiveDate>,
}

static SAMPLE_TODOS: Lazy<Vec<TodoItem>> = Lazy::new(|| {
    vec![
        TodoItem {
            id: 1,
            title: "Learn HTML".to_string(),
            status: TodoStatus::Done,
            completed_on: NaiveDate::from_ymd_opt(2021, 9, 11),
        },
        TodoItem {
            id: 2,
            title: "Learn TypeScript".to_string(),
            status: TodoStatus::InProgress,
            completed_on: None,
        },
        TodoItem {
            id: 3,
            title: "Write the best app in the world".to_string(),
            status: TodoStatus::Done,
            completed_on: None,
        },
    ]
});

const ID: Field<TodoItem, u64> = Field::new("id", |t: &TodoItem| &t.id);
const TITLE: Field<TodoItem, str> = Field::new("title", |t: &TodoItem| t.title.as_str());
const STATUS: Field<TodoItem, TodoStatus> = Field::new("status", |t: &TodoItem| &t.status);
const COMPLETED_ON: OptionalField<TodoItem, NaiveDate> =
    OptionalField::new("completed_on", |t: &TodoItem| t.completed_on.as_ref());

impl Identified for TodoItem {
    fn id(&self) -> u64 {
        self.id
    }
}

impl Record for TodoItem {
    fn field_names(&self) -> Vec<&str> {
        let mut fields = vec![ID.name(), TITLE.name(), STATUS.name()];
        if self.completed_on.is_some() {
            fields.push(COMPLETED_ON.name());
        }
        fields
    }

    fn value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(self.id.into()),
            "title" => Some(self.title.as_str().into()),
            "status" => Some(self.status.as_str().into()),
            "completed_on" => self.completed_on.map(Value::Date),
            _ => None,
        }
    }
}

impl<'a, E: 'a> Query<'a, TodoItem, E> {
    pub fn id(&mut self, predicate: impl Fn(&u64) -> bool + 'a) -> &mut Self {
        self.field(ID, predicate)
    }

    pub fn title(&mut self, predicate: impl Fn(&str) -> bool + 'a) -> &mut Self {
        self.field(TITLE, predicate)
    }

    pub fn status(&mut self, predicate: impl Fn(&TodoStatus) -> bool + 'a) -> &mut Self {
        self.field(STATUS, predicate)
    }

    pub fn completed_on(&mut self, predicate: impl Fn(&NaiveDate) -> bool + 'a) -> &mut Self {
        self.optional_field(COMPLETED_ON, predicate)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TodoList {
    items: Vec<TodoItem>,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    /// A list seeded with the three sample items.
    pub fn sample() -> Self {
        TodoList {
            items: SAMPLE_TODOS.clone(),
        }
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// Appends a new `Todo` item titled `title` and returns it.
    pub fn add(&mut self, title: &str) -> &TodoItem {
        let id = next_id(&self.items);
        debug!("Adding todo {id}: {title}");
        self.items.push(TodoItem {
            id,
            title: title.to_string(),
            status: TodoStatus::Todo,
            completed_on: None,
        });
        &self.items[self.items.len() - 1]
    }

    pub fn query(&self, query: &Query<'_, TodoItem>) -> Vec<&TodoItem> {
        query.apply(&self.items)
    }
}
