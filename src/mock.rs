//! Fixed presentation data for the dashboard panels

use crate::colors::StatusColor;
use crate::config::TimeRange;

pub const TITLE: &str = "SITUATION CENTER";
pub const BADGE: &str = "SITUATION OVERVIEW";
pub const OS_VERSION: &str = "OS VERSION: KERNEL-7.4.2";

pub const NAV_LEFT: [&str; 3] = ["RISK POSTURE", "ASSET POSTURE", "ATTACK POSTURE"];
pub const NAV_RIGHT: [&str; 3] = ["OPERATION POSTURE", "VULN POSTURE", "INTEL POSTURE"];

/// Headline metric shown across the top of the globe
pub struct TopMetric {
    pub label: &'static str,
    pub value: &'static str,
    pub status: StatusColor,
}

pub const TOP_METRICS: [TopMetric; 6] = [
    TopMetric { label: "Overall score", value: "51", status: StatusColor::Warning },
    TopMetric { label: "Asset posture", value: "Excellent", status: StatusColor::Good },
    TopMetric { label: "Operation posture", value: "Needs improvement", status: StatusColor::Warning },
    TopMetric { label: "Attack posture", value: "No attacks", status: StatusColor::Good },
    TopMetric { label: "Vulnerability posture", value: "Needs improvement", status: StatusColor::Warning },
    TopMetric { label: "Ops posture", value: "Needs improvement", status: StatusColor::Warning },
];

pub struct Stat {
    pub label: &'static str,
    pub value: &'static str,
}

pub const ALERT_STATS: [Stat; 3] = [
    Stat { label: "Alert volume", value: "0.99M" },
    Stat { label: "Tickets", value: "0" },
    Stat { label: "Handling rate", value: "0.0%" },
];

/// Alert handling stage: shield count (out of 8) and total
pub struct StatusRow {
    pub label: &'static str,
    pub shields: u8,
    pub total: &'static str,
}

pub const SHIELD_SLOTS: u8 = 8;

pub const STATUS_ROWS: [StatusRow; 4] = [
    StatusRow { label: "Pending", shields: 8, total: "0.99M" },
    StatusRow { label: "In progress", shields: 1, total: "6" },
    StatusRow { label: "Handled", shields: 1, total: "0" },
    StatusRow { label: "False positive", shields: 1, total: "0" },
];

/// One sample of the alert/log trend chart
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrendPoint {
    pub label: &'static str,
    pub alerts: u32,
    pub logs: u32,
}

const fn tp(label: &'static str, alerts: u32, logs: u32) -> TrendPoint {
    TrendPoint { label, alerts, logs }
}

const DAY_TREND: [TrendPoint; 8] = [
    tp("10-07 17", 18000, 65000),
    tp("10-07 21", 62000, 10000),
    tp("10-08 01", 68000, 12000),
    tp("10-08 05", 45000, 11000),
    tp("10-08 09", 30000, 15000),
    tp("10-08 13", 2500, 70000),
    tp("10-08 17", 42000, 12000),
    tp("10-08 21", 15000, 45000),
];

const WEEK_TREND: [TrendPoint; 7] = [
    tp("10-02", 210000, 380000),
    tp("10-03", 260000, 300000),
    tp("10-04", 190000, 420000),
    tp("10-05", 330000, 250000),
    tp("10-06", 280000, 310000),
    tp("10-07", 150000, 460000),
    tp("10-08", 240000, 350000),
];

const MONTH_TREND: [TrendPoint; 8] = [
    tp("09-09", 820000, 1400000),
    tp("09-13", 1100000, 980000),
    tp("09-17", 760000, 1650000),
    tp("09-21", 1300000, 1200000),
    tp("09-25", 940000, 1500000),
    tp("09-29", 1250000, 870000),
    tp("10-03", 680000, 1720000),
    tp("10-07", 1050000, 1100000),
];

pub fn trend(range: TimeRange) -> &'static [TrendPoint] {
    match range {
        TimeRange::Day => &DAY_TREND,
        TimeRange::Week => &WEEK_TREND,
        TimeRange::Month => &MONTH_TREND,
    }
}

/// Attack prediction categories, bar heights out of 6
pub const PREDICTION_MAX: f32 = 6.0;
pub const PREDICTIONS: [(&str, f32); 5] = [
    ("Intrusion", 5.5),
    ("Info hazard", 1.2),
    ("Sec warning", 3.5),
    ("Malware", 2.2),
    ("Recon", 4.2),
];

pub struct Asset {
    pub ip: &'static str,
    pub location: &'static str,
    pub hits: &'static str,
}

pub const ASSETS: [Asset; 5] = [
    Asset { ip: "115.231.54.13", location: "Ningbo", hits: "54.96M" },
    Asset { ip: "111.197.221.3", location: "Beijing", hits: "44.95M" },
    Asset { ip: "116.195.40.100", location: "Shanghai", hits: "44.02M" },
    Asset { ip: "110.17.71.41", location: "Baotou", hits: "43.97M" },
    Asset { ip: "134.225.72.28", location: "UK", hits: "32.99M" },
];

/// Ranks up to this one get the orange badge, the rest blue
pub const ASSET_HOT_RANKS: usize = 3;

pub struct Zone {
    pub name: &'static str,
    pub value: &'static str,
    pub percent: f32,
}

pub const ZONES: [Zone; 5] = [
    Zone { name: "What happened", value: "252.86M", percent: 90.0 },
    Zone { name: "Beijing Palace Museum", value: "55.93M", percent: 45.0 },
    Zone { name: "null", value: "54.96M", percent: 40.0 },
    Zone { name: "Jinan Baotu Spring Park", value: "22.01M", percent: 20.0 },
    Zone { name: "Wuhan Hubei Complex", value: "22.01M", percent: 20.0 },
];

pub const VULN_STATS: [Stat; 3] = [
    Stat { label: "Vulnerabilities", value: "140" },
    Stat { label: "Checks", value: "0" },
    Stat { label: "Weak passwords", value: "102" },
];

/// Kill-chain stage tickers along the bottom of the globe
pub const KILL_CHAIN: [Stat; 5] = [
    Stat { label: "RECON", value: "96.44M" },
    Stat { label: "PENETRATION", value: "89.55M" },
    Stat { label: "ATTACK", value: "13.78M" },
    Stat { label: "CONTROL", value: "48.22M" },
    Stat { label: "DESTROY", value: "48.74M" },
];
