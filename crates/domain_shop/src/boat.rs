//! Customer boats and the engines installed on them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{BoatId, CustomerId, EngineId};
use crate::error::ShopError;

/// A boat owned by a customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boat {
    pub id: BoatId,
    pub customer_id: CustomerId,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub colors: Vec<String>,
}

impl Boat {
    pub fn new(customer_id: CustomerId) -> Self {
        Self {
            id: BoatId::new_v7(),
            customer_id,
            make: None,
            model: None,
            year: None,
            colors: Vec::new(),
        }
    }

    pub fn with_make_model(mut self, make: impl Into<String>, model: impl Into<String>) -> Self {
        self.make = Some(make.into());
        self.model = Some(model.into());
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Short label such as "2019 Bayliner Element"
    pub fn label(&self) -> String {
        [
            self.year.map(|y| y.to_string()),
            self.make.clone(),
            self.model.clone(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Propulsion type of an installed engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineType {
    Outboard,
    Inboard,
    Sterndrive,
    Pwc,
}

impl EngineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineType::Outboard => "Outboard",
            EngineType::Inboard => "Inboard",
            EngineType::Sterndrive => "Sterndrive",
            EngineType::Pwc => "PWC",
        }
    }
}

impl fmt::Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineType {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "outboard" => Ok(EngineType::Outboard),
            "inboard" => Ok(EngineType::Inboard),
            "sterndrive" | "i/o" => Ok(EngineType::Sterndrive),
            "pwc" => Ok(EngineType::Pwc),
            other => Err(ShopError::validation(format!("unknown engine type '{}'", other))),
        }
    }
}

/// An engine installed on a customer's boat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engine {
    pub id: EngineId,
    pub boat_id: BoatId,
    pub engine_type: Option<EngineType>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub hp: Option<u32>,
    pub serial_number: String,
    pub year: Option<i32>,
    pub outdrive: Option<String>,
}

impl Engine {
    pub fn new(boat_id: BoatId, serial_number: impl Into<String>) -> Self {
        Self {
            id: EngineId::new_v7(),
            boat_id,
            engine_type: None,
            make: None,
            model: None,
            hp: None,
            serial_number: serial_number.into(),
            year: None,
            outdrive: None,
        }
    }

    pub fn with_type(mut self, engine_type: EngineType) -> Self {
        self.engine_type = Some(engine_type);
        self
    }

    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = Some(hp);
        self
    }
}
