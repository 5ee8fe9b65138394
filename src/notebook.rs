//! Starter notebook for the resource optimization exercise.
//!
//! The notebook is a static nbformat 4 document. Its code cells are text
//! for the analyst to run; nothing here executes them.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::OutputPaths;
use crate::error::Result;

pub const DEFAULT_NOTEBOOK_PATH: &str = "Alien_Colony_Resource_Optimization_Starter.ipynb";

pub const NBFORMAT: u32 = 4;
pub const NBFORMAT_MINOR: u32 = 4;

/// A notebook cell
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum Cell {
    Markdown {
        metadata: Map<String, Value>,
        source: Vec<String>,
    },
    Code {
        execution_count: Option<u32>,
        metadata: Map<String, Value>,
        outputs: Vec<Value>,
        source: Vec<String>,
    },
}

impl Cell {
    pub fn markdown(text: &str) -> Self {
        Cell::Markdown {
            metadata: Map::new(),
            source: source_lines(text),
        }
    }

    /// An unexecuted code cell
    pub fn code(text: &str) -> Self {
        Cell::Code {
            execution_count: None,
            metadata: Map::new(),
            outputs: Vec::new(),
            source: source_lines(text),
        }
    }

    pub fn source(&self) -> &[String] {
        match self {
            Cell::Markdown { source, .. } | Cell::Code { source, .. } => source,
        }
    }
}

/// Split text into notebook source lines, each keeping its newline.
fn source_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KernelSpec {
    pub display_name: String,
    pub language: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CodeMirrorMode {
    pub name: String,
    pub version: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub codemirror_mode: CodeMirrorMode,
    pub file_extension: String,
    pub mimetype: String,
    pub name: String,
    pub nbconvert_exporter: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotebookMetadata {
    pub kernelspec: KernelSpec,
    pub language_info: LanguageInfo,
}

impl Default for NotebookMetadata {
    fn default() -> Self {
        Self {
            kernelspec: KernelSpec {
                display_name: "Python 3".to_string(),
                language: "python".to_string(),
                name: "python3".to_string(),
            },
            language_info: LanguageInfo {
                codemirror_mode: CodeMirrorMode {
                    name: "ipython".to_string(),
                    version: 3,
                },
                file_extension: ".py".to_string(),
                mimetype: "text/x-python".to_string(),
                name: "python".to_string(),
                nbconvert_exporter: "python".to_string(),
                version: "3.8.5".to_string(),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,
    pub metadata: NotebookMetadata,
    pub nbformat: u32,
    pub nbformat_minor: u32,
}

/// Build the exercise notebook, loading the tables from `paths`.
pub fn starter_notebook(paths: &OutputPaths) -> Notebook {
    let load = format!(
        "# Import necessary libraries\n\
         import pandas as pd\n\
         import numpy as np\n\
         import matplotlib.pyplot as plt\n\
         import seaborn as sns\n\
         \n\
         # Load the datasets\n\
         alien_consumption = pd.read_csv('{}')\n\
         mars_weather = pd.read_csv('{}')\n\
         galactic_events = pd.read_csv('{}')\n\
         \n\
         # Display the first few rows of each dataset\n\
         display(alien_consumption.head())\n\
         display(mars_weather.head())\n\
         display(galactic_events.head())\n",
        paths.consumption.display(),
        paths.weather.display(),
        paths.events.display(),
    );

    let cells = vec![
        Cell::markdown(
            "# Alien Colony Resource Optimization on Mars\n\
             ## Project Overview\n\
             In this project, you will analyze the resource consumption of an alien colony on Mars. \
             Your goal is to build a model to predict future resource consumption and provide optimization recommendations.\n\
             You'll use historical consumption data, Martian weather data, and galactic event data \
             to understand how these factors affect the colony's needs.\n",
        ),
        Cell::code(&load),
        Cell::markdown(
            "## Data Exploration\n\
             Before building models, explore the datasets:\n\
             - Check for missing values.\n\
             - Understand the distribution of the resource consumption, temperatures, and galactic events.\n",
        ),
        Cell::code(
            "# Check for missing values\n\
             print('Alien Consumption Missing Values:', alien_consumption.isnull().sum())\n\
             print('Mars Weather Missing Values:', mars_weather.isnull().sum())\n\
             print('Galactic Events Missing Values:', galactic_events.isnull().sum())\n",
        ),
        Cell::markdown(
            "## Merging Datasets\n\
             To analyze how weather and galactic events impact resource consumption, merge the datasets:\n\
             - Merge `alien_consumption` with `mars_weather` on the `date`.\n\
             - Consider how to incorporate `galactic_events`, as they happen on fewer days.\n",
        ),
        Cell::code(
            "# Merge alien consumption with Mars weather\n\
             merged_data = pd.merge(alien_consumption, mars_weather, on='date', how='left')\n\
             \n\
             # Merge galactic events (can be more sparse, so use a left join)\n\
             merged_data = pd.merge(merged_data, galactic_events, on='date', how='left')\n\
             \n\
             # Display the first few rows of the merged dataset\n\
             display(merged_data.head())",
        ),
        Cell::markdown(
            "## Correlation Analysis\n\
             Analyze correlations between resource consumption, temperature, solar radiation, and galactic events.\n\
             - Does resource consumption increase during extreme temperatures?\n\
             - How do galactic events impact resource consumption?\n",
        ),
        Cell::code(
            "# Correlation analysis\n\
             numeric_cols = ['quantity', 'temperature', 'avg_temperature_celsius', 'solar_radiation_kwh_m2', 'intensity']\n\
             correlation_matrix = merged_data[numeric_cols].corr()\n\
             plt.figure(figsize=(10,6))\n\
             sns.heatmap(correlation_matrix, annot=True, cmap='coolwarm')\n\
             plt.title('Correlation Matrix for Alien Resource Consumption Data')\n\
             plt.show()",
        ),
        Cell::markdown(
            "## Resource Forecasting\n\
             Now that we have explored the data, let's build a simple forecasting model.\n\
             - Use historical resource consumption data and external factors (weather, galactic events) to forecast future needs.\n\
             - Consider using models like ARIMA, or more advanced methods like Random Forest or XGBoost.\n",
        ),
        Cell::code(
            "# Example: Simple Time Series Forecasting using ARIMA\n\
             from statsmodels.tsa.arima.model import ARIMA\n\
             \n\
             # Aggregate resource consumption by date\n\
             consumption_by_date = alien_consumption.groupby('date').agg({'quantity': 'sum'}).reset_index()\n\
             consumption_by_date['date'] = pd.to_datetime(consumption_by_date['date'])\n\
             consumption_by_date.set_index('date', inplace=True)\n\
             \n\
             # Fit ARIMA model\n\
             model = ARIMA(consumption_by_date['quantity'], order=(5, 1, 0))\n\
             arima_model = model.fit()\n\
             \n\
             # Forecast consumption for the next 30 days\n\
             forecast = arima_model.forecast(steps=30)\n\
             print(forecast)",
        ),
        Cell::markdown(
            "## Insights and Recommendations\n\
             After building your model, analyze the results:\n\
             - What do the forecasts suggest about future resource consumption?\n\
             - How should the Mars colony allocate resources to ensure the needs of both humans and aliens are met?\n\
             - What strategies can be implemented to handle spikes in consumption caused by galactic events?\n",
        ),
    ];

    Notebook {
        cells,
        metadata: NotebookMetadata::default(),
        nbformat: NBFORMAT,
        nbformat_minor: NBFORMAT_MINOR,
    }
}

/// Write the starter notebook as pretty-printed JSON.
pub fn write_notebook(notebook: &Notebook, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(notebook)?;
    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;
    file.flush()?;
    info!("Wrote notebook {}", path.display());
    Ok(())
}
