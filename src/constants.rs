//! Application constants and configuration

use std::time::Duration;

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "Laptop Price Compare";

/// Backend used when neither the environment nor settings name one
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const API_URL_ENV: &str = "LAPTOP_PRICE_API_URL";

pub const SOURCE_REPO_URL: &str =
    "https://github.com/muhammadsyukri19/laptop-price-regression-prak-ai";

pub const OPTIONS_TIMEOUT: Duration = Duration::from_secs(10);
pub const PREDICT_TIMEOUT: Duration = Duration::from_secs(15);
pub const CHART_TIMEOUT: Duration = Duration::from_secs(30);

/// Options fetch retries: delay before retry N is `2 * N` seconds
pub const OPTIONS_MAX_RETRIES: u32 = 3;
pub const OPTIONS_BACKOFF_STEP: Duration = Duration::from_secs(2);

/// Fixed EUR -> IDR rate used for display
pub const EUR_TO_IDR: f64 = 17000.0;
pub const REFERENCE_CURRENCY: &str = "EUR";

/// Chart catalog served under `/visualizations/<name>`: (name, title, description)
pub const CHARTS: &[(&str, &str, &str)] = &[
    (
        "price-distribution",
        "Price Distribution",
        "Histogram showing the distribution of laptop prices across the dataset",
    ),
    (
        "brand-analysis",
        "Brand Price Analysis",
        "Top 10 brands by average price - see which manufacturers command premium pricing",
    ),
    (
        "type-distribution",
        "Laptop Type Distribution",
        "Market share of different laptop types (Notebook, Gaming, etc.)",
    ),
    (
        "price-segments",
        "Market Price Segments",
        "Low (0-600 EUR), Mid (600-1200 EUR), High (1200-2000 EUR), Ultra (2000+ EUR)",
    ),
    (
        "ram-vs-price",
        "RAM vs Price",
        "Relationship between RAM capacity and laptop price",
    ),
    (
        "screen-size-analysis",
        "Screen Size Analysis",
        "Distribution and average pricing across different screen sizes",
    ),
    (
        "os-comparison",
        "OS Price Comparison",
        "Average prices across different operating systems",
    ),
    (
        "model-performance",
        "Model Performance Metrics",
        "Linear Regression evaluation metrics: MAE, RMSE and R² score",
    ),
    (
        "actual-vs-predicted",
        "Actual vs Predicted Prices",
        "How closely the trained Linear Regression tracks real prices",
    ),
];
