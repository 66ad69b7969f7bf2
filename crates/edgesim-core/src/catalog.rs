//! Static parameter catalog: algorithms, form labels, request keys, defaults, tooltips.
//!
//! The request keys are the exact query-parameter names the algorithm service
//! accepts, typos included (`batery_capacity`, `lamda_low`).

use serde::Serialize;

/// Algorithms the service knows how to run, in display order.
pub const ALGORITHM_NAMES: &[&str] = &["PPO", "DQN", "A2C", "SAC", "TRPO"];

/// Which request field(s) a label maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequestKey {
    Single(&'static str),
    Range {
        low: &'static str,
        high: &'static str,
    },
}

impl RequestKey {
    pub fn keys(&self) -> Vec<&'static str> {
        match *self {
            RequestKey::Single(key) => vec![key],
            RequestKey::Range { low, high } => vec![low, high],
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys().contains(&key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Scalar(f64),
    Range { low: f64, high: f64 },
}

impl DefaultValue {
    /// Text a scalar field starts with (`15`, `0.5`). Ranges start empty.
    pub fn initial_text(&self) -> Option<String> {
        match *self {
            DefaultValue::Scalar(v) => Some(v.to_string()),
            DefaultValue::Range { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Description {
    Single(&'static str),
    Range {
        low: &'static str,
        high: &'static str,
    },
}

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamSpec {
    pub label: &'static str,
    pub request_key: RequestKey,
    pub default: DefaultValue,
    pub description: Description,
}

impl ParamSpec {
    pub fn is_range(&self) -> bool {
        matches!(self.request_key, RequestKey::Range { .. })
    }
}

/// The two groups of parameters shown on every algorithm page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Environment,
    Algorithm,
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::Environment => "Set up environment parameters",
            Section::Algorithm => "Set up algorithm parameters",
        }
    }

    pub fn params(&self) -> &'static [ParamSpec] {
        match self {
            Section::Environment => ENV_PARAMS,
            Section::Algorithm => ALGO_PARAMS,
        }
    }
}

pub const ENV_PARAMS: &[ParamSpec] = &[
    ParamSpec {
        label: "Priority coefficient",
        request_key: RequestKey::Single("p_coeff"),
        default: DefaultValue::Scalar(0.5),
        description: Description::Single(
            "Weight of the energy cost against the delay cost in the reward",
        ),
    },
    ParamSpec {
        label: "Number of servers",
        request_key: RequestKey::Single("max_number_of_server"),
        default: DefaultValue::Scalar(15.0),
        description: Description::Single("Maximum number of edge servers that can be activated"),
    },
    ParamSpec {
        label: "Length each time slot",
        request_key: RequestKey::Single("timeslot_duration"),
        default: DefaultValue::Scalar(15.0),
        description: Description::Single("Duration of one time slot, in minutes"),
    },
    ParamSpec {
        label: "Battery capacity",
        request_key: RequestKey::Single("batery_capacity"),
        default: DefaultValue::Scalar(2000.0),
        description: Description::Single("Battery capacity B, in Wh"),
    },
    ParamSpec {
        label: "Server service rate",
        request_key: RequestKey::Single("server_service_rate"),
        default: DefaultValue::Scalar(20.0),
        description: Description::Single("Service rate κ of a single server, in units/sec"),
    },
    ParamSpec {
        label: "Workload (λ)",
        request_key: RequestKey::Range {
            low: "lamda_low",
            high: "lamda_high",
        },
        default: DefaultValue::Range {
            low: 20.0,
            high: 100.0,
        },
        description: Description::Range {
            low: "Lowest workload arrival rate λ, in units/sec",
            high: "Highest workload arrival rate λ, in units/sec",
        },
    },
    ParamSpec {
        label: "Network congestion (k)",
        request_key: RequestKey::Range {
            low: "h_low",
            high: "h_high",
        },
        default: DefaultValue::Range {
            low: 0.02,
            high: 0.06,
        },
        description: Description::Range {
            low: "Lowest network congestion delay, in sec/unit",
            high: "Highest network congestion delay, in sec/unit",
        },
    },
    ParamSpec {
        label: "Back up power coefficient (φ)",
        request_key: RequestKey::Single("back_up_cost_coef"),
        default: DefaultValue::Scalar(0.15),
        description: Description::Single("Cost coefficient ϕ of the backup power supply"),
    },
    ParamSpec {
        label: "Battery depreciation coefficient (ω)",
        request_key: RequestKey::Single("normalized_unit_depreciation_cost"),
        default: DefaultValue::Scalar(0.01),
        description: Description::Single("Normalized unit depreciation cost ω of the battery"),
    },
    ParamSpec {
        label: "Base station static power",
        request_key: RequestKey::Single("d_sta"),
        default: DefaultValue::Scalar(300.0),
        description: Description::Single("Static power consumption of the base station, in W"),
    },
    ParamSpec {
        label: "Dynamic power coefficient",
        request_key: RequestKey::Single("coef_dyn"),
        default: DefaultValue::Scalar(0.5),
        description: Description::Single(
            "Dynamic base station power per unit of workload",
        ),
    },
    ParamSpec {
        label: "Server power consumption",
        request_key: RequestKey::Single("server_power_consumption"),
        default: DefaultValue::Scalar(150.0),
        description: Description::Single("Power drawn by one active server, in W"),
    },
];

pub const ALGO_PARAMS: &[ParamSpec] = &[
    ParamSpec {
        label: "Time steps per episode",
        request_key: RequestKey::Single("time_steps_per_episode"),
        default: DefaultValue::Scalar(96.0),
        description: Description::Single("Number of time slots in one training episode"),
    },
    ParamSpec {
        label: "Training time slots",
        request_key: RequestKey::Single("train_time_slots"),
        default: DefaultValue::Scalar(2000.0),
        description: Description::Single("Total number of time slots used for training"),
    },
    ParamSpec {
        label: "Time slots",
        request_key: RequestKey::Single("time_slots"),
        default: DefaultValue::Scalar(100.0),
        description: Description::Single("Number of time slots simulated after training"),
    },
    ParamSpec {
        label: "Verbose",
        request_key: RequestKey::Single("verbose"),
        default: DefaultValue::Scalar(0.0),
        description: Description::Single("Verbosity of the training log (0 = silent)"),
    },
    ParamSpec {
        label: "Random seed",
        request_key: RequestKey::Single("random_seed"),
        default: DefaultValue::Scalar(1234.0),
        description: Description::Single("Seed for the environment and the model"),
    },
];

/// Iterate every catalog entry, environment parameters first.
pub fn all_params() -> impl Iterator<Item = &'static ParamSpec> {
    ENV_PARAMS.iter().chain(ALGO_PARAMS.iter())
}

pub fn find_by_label(label: &str) -> Option<&'static ParamSpec> {
    all_params().find(|p| p.label == label)
}

pub fn find_by_key(key: &str) -> Option<&'static ParamSpec> {
    all_params().find(|p| p.request_key.contains(key))
}

pub fn is_request_key(key: &str) -> bool {
    find_by_key(key).is_some()
}

/// Every request key the catalog declares, in catalog order.
pub fn request_keys() -> Vec<&'static str> {
    all_params().flat_map(|p| p.request_key.keys()).collect()
}

pub fn is_algorithm(name: &str) -> bool {
    ALGORITHM_NAMES.contains(&name)
}
