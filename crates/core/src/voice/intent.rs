//! Keyword and pattern extraction from recognized Mandarin text.
//!
//! Both parsers are best effort: anything not found stays `None` (or at its
//! default) and the raw text is returned alongside.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tripwise_shared::Money;

use crate::expense::ExpenseCategory;

/// Travel parameters spoken by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelIntent {
    /// Destination.
    pub destination: Option<String>,
    /// Trip length in days.
    pub days: Option<u32>,
    /// Budget.
    pub budget: Option<Money>,
    /// Travellers, 1 unless stated.
    pub people_count: u32,
    /// Preference labels.
    pub preferences: Vec<String>,
    /// Text the intent was read from.
    pub raw_text: String,
}

/// Expense details spoken by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseIntent {
    /// Amount spent.
    pub amount: Option<Money>,
    /// Category, `other` unless a keyword matched.
    pub category: ExpenseCategory,
    /// Short description.
    pub description: Option<String>,
    /// When the expense happened.
    pub expense_date: DateTime<Utc>,
    /// Text the intent was read from.
    pub raw_text: String,
}

const CJK: &str = r"[\x{4e00}-\x{9fa5}]+";

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().filter_map(|p| Regex::new(p).ok()).collect()
}

static DESTINATION: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        format!("去({CJK})"),
        format!("到({CJK})"),
        format!("想去({CJK})"),
        format!("({CJK})旅游"),
        format!("({CJK})旅行"),
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

static DAYS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(&[r"(\d+)天", r"(\d+)日", r"(\d+)个晚上"]));

/// Budget patterns; the flag marks amounts given in units of ten thousand.
static BUDGET: LazyLock<Vec<(Regex, bool)>> = LazyLock::new(|| {
    [
        (r"预算(\d+)元", false),
        (r"预算(\d+)块", false),
        (r"(\d+)元预算", false),
        (r"(\d+)块钱", false),
        (r"预算.*?(\d+)", false),
        (r"(\d+)万", true),
    ]
    .into_iter()
    .filter_map(|(p, wan)| Regex::new(p).ok().map(|re| (re, wan)))
    .collect()
});

static PEOPLE: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(&[r"(\d+)人", r"(\d+)个人"]));

const PREFERENCES: [(&str, &[&str]); 8] = [
    ("美食", &["美食", "吃", "小吃", "餐厅", "美味"]),
    ("购物", &["购物", "买东西", "商场", "逛街"]),
    ("文化", &["文化", "历史", "博物馆", "古迹", "遗产"]),
    ("自然风光", &["风景", "自然", "山水", "海边", "沙滩", "森林"]),
    ("亲子", &["亲子", "带孩子", "小孩", "儿童"]),
    ("休闲", &["休闲", "放松", "度假"]),
    ("冒险", &["冒险", "刺激", "极限"]),
    ("摄影", &["拍照", "摄影", "打卡"]),
];

/// Ordered from most to least specific.
static AMOUNT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)花了?(\d+\.?\d*)元",
        r"(?i)花了?(\d+\.?\d*)块",
        r"(?i)消费了?(\d+\.?\d*)元?",
        r"(?i)支付了?(\d+\.?\d*)元?",
        r"(?i)花费(\d+\.?\d*)元?",
        r"(?i)(\d+\.?\d*)块钱",
        r"(?i)(\d+\.?\d*)rmb",
        r"(?i)(\d+\.?\d*)元",
    ])
});

const CATEGORY_KEYWORDS: [(ExpenseCategory, &[&str]); 6] = [
    (
        ExpenseCategory::Transport,
        &[
            "打车", "出租车", "滴滴", "公交", "地铁", "火车", "高铁", "飞机", "机票", "车票",
            "交通", "油费", "停车",
        ],
    ),
    (
        ExpenseCategory::Accommodation,
        &["酒店", "住宿", "旅馆", "民宿", "客栈", "宾馆", "房费"],
    ),
    (
        ExpenseCategory::Food,
        &[
            "吃饭", "餐厅", "饭店", "美食", "午餐", "晚餐", "早餐", "夜宵", "小吃", "餐费",
            "喝咖啡", "奶茶",
        ],
    ),
    (
        ExpenseCategory::Attraction,
        &["门票", "景点", "游览", "参观", "博物馆", "公园", "游乐园", "动物园"],
    ),
    (
        ExpenseCategory::Shopping,
        &["购物", "买", "商场", "超市", "纪念品", "特产", "商店"],
    ),
    (ExpenseCategory::Other, &["其他", "杂费", "费用"]),
];

static LOCATION: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"在(.{2,10}?)(?:吃饭|消费|购物|花了)",
        r"(.{2,10}?)(?:餐厅|饭店|商场|超市|店)",
    ])
});

static AMOUNT_TEXT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d*[元块钱rmb]*").ok());

static SPEND_VERBS: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[花了消费支付]").ok());

const RELATIVE_DAYS: [(&str, i64); 4] = [("昨天", -1), ("前天", -2), ("今天", 0), ("刚才", 0)];

const LOCATION_MAX_CHARS: usize = 20;
const FALLBACK_DESCRIPTION_MAX_CHARS: usize = 50;
const FALLBACK_DESCRIPTION: &str = "消费";

fn first_capture<'t>(patterns: &[Regex], text: &'t str) -> Option<&'t str> {
    patterns
        .iter()
        .find_map(|re| re.captures(text).and_then(|c| c.get(1)))
        .map(|m| m.as_str())
}

fn parse_number(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim_end_matches('.')).ok()
}

/// Extracts travel planning parameters.
#[must_use]
pub fn parse_travel_intent(text: &str) -> TravelIntent {
    let destination = first_capture(&DESTINATION, text).map(str::to_string);
    let days = first_capture(&DAYS, text).and_then(|d| d.parse().ok());

    let budget = BUDGET
        .iter()
        .find_map(|(re, wan)| {
            let value = parse_number(re.captures(text)?.get(1)?.as_str())?;
            if *wan {
                value.checked_mul(Decimal::from(10_000))
            } else {
                Some(value)
            }
        })
        .map(Money::new)
        .filter(Money::is_storable);

    let people_count = first_capture(&PEOPLE, text)
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);

    let preferences = PREFERENCES
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(label, _)| (*label).to_string())
        .collect();

    TravelIntent {
        destination,
        days,
        budget,
        people_count,
        preferences,
        raw_text: text.to_string(),
    }
}

/// Extracts an expense record. `now` anchors relative dates.
#[must_use]
pub fn parse_expense_intent(text: &str, now: DateTime<Utc>) -> ExpenseIntent {
    let amount = AMOUNT
        .iter()
        .find_map(|re| parse_number(re.captures(text)?.get(1)?.as_str()))
        .map(Money::new)
        .filter(Money::is_storable);

    let matched = CATEGORY_KEYWORDS.iter().find_map(|(category, keywords)| {
        keywords
            .iter()
            .find(|k| text.contains(*k))
            .map(|k| (*category, *k))
    });
    let category = matched.map_or(ExpenseCategory::Other, |(c, _)| c);
    let mut description = matched.map(|(_, keyword)| keyword.to_string());

    if let Some(caps) = LOCATION.iter().find_map(|re| re.captures(text)) {
        let location = caps.get(1).map_or("", |m| m.as_str().trim());
        if !location.is_empty() && location.chars().count() <= LOCATION_MAX_CHARS {
            description = Some(match description {
                Some(keyword) => format!("{location} - {keyword}"),
                None => location.to_string(),
            });
        }
    }

    if description.is_none() && amount.is_some() {
        description = Some(leftover_text(text));
    }

    let offset = RELATIVE_DAYS
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map_or(0, |(_, days)| *days);

    ExpenseIntent {
        amount,
        category,
        description,
        expense_date: now + Duration::days(offset),
        raw_text: text.to_string(),
    }
}

/// The text with amounts and spending verbs removed.
fn leftover_text(text: &str) -> String {
    let mut rest = text.to_string();
    if let Some(re) = AMOUNT_TEXT.as_ref() {
        rest = re.replace_all(&rest, "").into_owned();
    }
    if let Some(re) = SPEND_VERBS.as_ref() {
        rest = re.replace_all(rest.trim(), "").into_owned();
    }
    let rest = rest.trim();
    if rest.is_empty() || rest.chars().count() > FALLBACK_DESCRIPTION_MAX_CHARS {
        FALLBACK_DESCRIPTION.to_string()
    } else {
        rest.to_string()
    }
}
