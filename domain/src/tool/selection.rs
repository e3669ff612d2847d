//! Deterministic keyword rules and candidate merging for tool selection.
//!
//! Two ranked lists feed selection: semantic hits from a tool index and
//! keyword-rule hits from [`KEYWORD_RULES`]. [`merge_candidates`] combines
//! them: keyword hits first (the rule evaluated last ends up first), then
//! semantic hits in rank order, without duplicates.

/// Maps domain vocabulary to one tool
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub tool: &'static str,
    pub terms: &'static [&'static str],
}

impl KeywordRule {
    /// Whether any term occurs in `lowered` (already lower-cased text).
    ///
    /// Short ASCII abbreviations ("pe", "ma", "var") must match a whole
    /// word; everything else matches as a substring.
    pub fn matches(&self, lowered: &str) -> bool {
        self.terms.iter().any(|term| term_matches(lowered, term))
    }
}

/// Rules in evaluation order.
pub const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        tool: "get_stock_symbol",
        terms: &["mã cổ phiếu", "ticker", "symbol", "mã chứng khoán"],
    },
    KeywordRule {
        tool: "get_sector_mapping",
        terms: &["ngành", "sector", "industry", "lĩnh vực"],
    },
    KeywordRule {
        tool: "get_macro_data",
        terms: &[
            "lạm phát",
            "inflation",
            "cpi",
            "gdp",
            "thất nghiệp",
            "unemployment",
            "lãi suất",
            "interest rate",
            "vĩ mô",
            "macro",
        ],
    },
    KeywordRule {
        tool: "get_exchange_info",
        terms: &["sàn", "exchange", "hose", "hnx", "upcom"],
    },
    KeywordRule {
        tool: "get_currency_rate",
        terms: &["tỷ giá", "exchange rate", "usd", "vnd", "currency", "đô la", "đồng"],
    },
    KeywordRule {
        tool: "get_income_statement",
        terms: &[
            "doanh thu",
            "revenue",
            "lợi nhuận",
            "profit",
            "earnings",
            "income statement",
            "kết quả kinh doanh",
            "ebitda",
            "net income",
        ],
    },
    KeywordRule {
        tool: "get_balance_sheet",
        terms: &[
            "vốn chủ",
            "equity",
            "tài sản",
            "assets",
            "debt",
            "liabilities",
            "nợ",
            "bảng cân đối",
            "balance sheet",
        ],
    },
    KeywordRule {
        tool: "analyze_cashflow",
        terms: &[
            "dòng tiền",
            "cash flow",
            "operating cash",
            "investing cash",
            "financing cash",
            "free cash flow",
            "fcf",
        ],
    },
    KeywordRule {
        tool: "calculate_ratios",
        terms: &[
            "roe",
            "roa",
            "pe",
            "p/e",
            "pb",
            "p/b",
            "eps",
            "tỷ số",
            "tỷ lệ",
            "chỉ số tài chính",
            "margin",
            "biên lợi nhuận",
        ],
    },
    KeywordRule {
        tool: "estimate_fair_value",
        terms: &["định giá", "valuation", "fair value", "giá trị hợp lý", "dcf", "ddm", "peg"],
    },
    KeywordRule {
        tool: "get_technical_indicators",
        terms: &[
            "rsi",
            "macd",
            "ma",
            "moving average",
            "bollinger",
            "technical",
            "chỉ báo kỹ thuật",
            "đường trung bình",
        ],
    },
    KeywordRule {
        tool: "get_stock_price",
        terms: &["giá", "price", "stock price", "thị giá"],
    },
    KeywordRule {
        tool: "get_fundamentals",
        terms: &["thông tin cơ bản", "fundamental", "profile"],
    },
    KeywordRule {
        tool: "get_risk_metrics",
        terms: &[
            "risk",
            "volatility",
            "beta",
            "sharpe",
            "sortino",
            "drawdown",
            "var",
            "rủi ro",
            "biến động",
        ],
    },
];

const WHOLE_WORD_MAX_LEN: usize = 4;

fn term_matches(lowered: &str, term: &str) -> bool {
    let whole_word = term.len() <= WHOLE_WORD_MAX_LEN && term.chars().all(|c| c.is_ascii_alphanumeric());
    if !whole_word {
        return lowered.contains(term);
    }
    lowered
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word == term)
}

/// Tools whose rules match `text`, in rule evaluation order.
pub fn keyword_hits(text: &str) -> Vec<&'static str> {
    let lowered = text.to_lowercase();
    KEYWORD_RULES
        .iter()
        .filter(|rule| rule.matches(&lowered))
        .map(|rule| rule.tool)
        .collect()
}

/// Merge keyword hits (in evaluation order) with semantic hits (in rank order).
///
/// Every keyword hit is placed at the front in turn, so the last matched
/// rule comes first. Semantic hits follow. Duplicates keep their first
/// position.
pub fn merge_candidates<S: AsRef<str>>(keyword_hits: &[&str], semantic_hits: &[S]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(keyword_hits.len() + semantic_hits.len());

    for hit in keyword_hits.iter().rev() {
        if !merged.iter().any(|m| m == hit) {
            merged.push((*hit).to_string());
        }
    }
    for hit in semantic_hits {
        let hit = hit.as_ref();
        if !merged.iter().any(|m| m == hit) {
            merged.push(hit.to_string());
        }
    }

    merged
}
