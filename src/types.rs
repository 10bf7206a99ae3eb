//! Common types and data structures

use serde::{Deserialize, Serialize};

/// Which of the two compared laptops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::Left => "Laptop 1",
            Side::Right => "Laptop 2",
        }
    }
}

/// Catalog of valid values per specification field, from `GET /options`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OptionSet {
    pub companies: Vec<String>,
    pub products: Vec<String>,
    pub typenames: Vec<String>,
    pub screen_resolutions: Vec<String>,
    pub cpus: Vec<String>,
    pub rams_gb: Vec<i64>,
    pub memories: Vec<String>,
    pub gpus: Vec<String>,
    pub opsys: Vec<String>,
    pub inches: Vec<f64>,
    pub weights: Vec<f64>,
}

impl OptionSet {
    /// Values offered for `field`, rendered the way the form stores them.
    pub fn choices(&self, field: SpecField) -> Vec<String> {
        fn strings(values: &[String]) -> Vec<String> {
            values.to_vec()
        }
        fn numbers<T: ToString>(values: &[T]) -> Vec<String> {
            values.iter().map(ToString::to_string).collect()
        }

        match field {
            SpecField::Company => strings(&self.companies),
            SpecField::Product => strings(&self.products),
            SpecField::TypeName => strings(&self.typenames),
            SpecField::Inches => numbers(&self.inches),
            SpecField::ScreenResolution => strings(&self.screen_resolutions),
            SpecField::Cpu => strings(&self.cpus),
            SpecField::Ram => numbers(&self.rams_gb),
            SpecField::Memory => strings(&self.memories),
            SpecField::Gpu => strings(&self.gpus),
            SpecField::OpSys => strings(&self.opsys),
            SpecField::Weight => numbers(&self.weights),
        }
    }
}

/// The eleven specification fields, in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecField {
    Company,
    Product,
    TypeName,
    Inches,
    ScreenResolution,
    Cpu,
    Ram,
    Memory,
    Gpu,
    OpSys,
    Weight,
}

impl SpecField {
    pub const ALL: [SpecField; 11] = [
        SpecField::Company,
        SpecField::Product,
        SpecField::TypeName,
        SpecField::Inches,
        SpecField::ScreenResolution,
        SpecField::Cpu,
        SpecField::Ram,
        SpecField::Memory,
        SpecField::Gpu,
        SpecField::OpSys,
        SpecField::Weight,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SpecField::Company => "Brand",
            SpecField::Product => "Product",
            SpecField::TypeName => "Type",
            SpecField::Inches => "Screen size (inches)",
            SpecField::ScreenResolution => "Screen resolution",
            SpecField::Cpu => "CPU",
            SpecField::Ram => "RAM (GB)",
            SpecField::Memory => "Storage",
            SpecField::Gpu => "GPU",
            SpecField::OpSys => "Operating system",
            SpecField::Weight => "Weight (kg)",
        }
    }
}

/// One side's editable selection. All values are kept as the strings shown in the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaptopForm {
    pub company: String,
    pub product: String,
    pub type_name: String,
    pub inches: String,
    pub screen_resolution: String,
    pub cpu: String,
    pub ram: String,
    pub memory: String,
    pub gpu: String,
    pub op_sys: String,
    pub weight: String,
}

impl LaptopForm {
    /// Default selection for `side` once the catalog has arrived.
    ///
    /// Left takes the first entry of every list, right the second (or the only one).
    /// An empty list leaves the field empty.
    pub fn seeded(options: &OptionSet, side: Side) -> Self {
        let mut form = Self::default();
        for field in SpecField::ALL {
            let choices = options.choices(field);
            let preferred = match side {
                Side::Left => 0,
                Side::Right => 1.min(choices.len().saturating_sub(1)),
            };
            *form.get_mut(field) = choices
                .get(preferred)
                .or_else(|| choices.first())
                .cloned()
                .unwrap_or_default();
        }
        form
    }

    pub fn get(&self, field: SpecField) -> &str {
        match field {
            SpecField::Company => &self.company,
            SpecField::Product => &self.product,
            SpecField::TypeName => &self.type_name,
            SpecField::Inches => &self.inches,
            SpecField::ScreenResolution => &self.screen_resolution,
            SpecField::Cpu => &self.cpu,
            SpecField::Ram => &self.ram,
            SpecField::Memory => &self.memory,
            SpecField::Gpu => &self.gpu,
            SpecField::OpSys => &self.op_sys,
            SpecField::Weight => &self.weight,
        }
    }

    pub fn get_mut(&mut self, field: SpecField) -> &mut String {
        match field {
            SpecField::Company => &mut self.company,
            SpecField::Product => &mut self.product,
            SpecField::TypeName => &mut self.type_name,
            SpecField::Inches => &mut self.inches,
            SpecField::ScreenResolution => &mut self.screen_resolution,
            SpecField::Cpu => &mut self.cpu,
            SpecField::Ram => &mut self.ram,
            SpecField::Memory => &mut self.memory,
            SpecField::Gpu => &mut self.gpu,
            SpecField::OpSys => &mut self.op_sys,
            SpecField::Weight => &mut self.weight,
        }
    }
}

/// Body of `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PredictRequest {
    pub company: String,
    pub product: String,
    pub type_name: String,
    pub inches: f64,
    pub screen_resolution: String,
    pub cpu: String,
    pub ram: i64,
    pub memory: String,
    pub gpu: String,
    pub op_sys: String,
    pub weight: f64,
}

/// Response of `POST /predict`; price is in the reference currency
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictResponse {
    pub predicted_price: f64,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Both predicted prices of one successful comparison
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePair {
    pub left: f64,
    pub right: f64,
}

/// Current prices of both sides. Derived values are computed on every read.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Comparison {
    pub left: Option<f64>,
    pub right: Option<f64>,
}

impl Comparison {
    pub fn price(&self, side: Side) -> Option<f64> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn set(&mut self, pair: PricePair) {
        self.left = Some(pair.left);
        self.right = Some(pair.right);
    }

    pub fn clear(&mut self) {
        self.left = None;
        self.right = None;
    }

    pub fn difference(&self) -> Option<f64> {
        Some((self.left? - self.right?).abs())
    }

    /// Side with the lower price; `None` while a price is missing or on a tie.
    pub fn cheaper(&self) -> Option<Side> {
        let (left, right) = (self.left?, self.right?);
        if left < right {
            Some(Side::Left)
        } else if right < left {
            Some(Side::Right)
        } else {
            None
        }
    }
}
