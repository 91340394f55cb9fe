use std::collections::HashSet;
use std::path::Path;

use quotegate_core::search::entity::StockEntry;

use crate::error::SearchError;

/// 内置参考表：(代码, 展示名称, 关键字)
const BUILTIN_STOCKS: &[(&str, &str, &[&str])] = &[
    // Tech Giants
    ("AAPL", "Apple Inc.", &["apple", "iphone", "mac", "ipad"]),
    ("MSFT", "Microsoft Corporation", &["microsoft", "windows", "azure", "xbox"]),
    ("GOOGL", "Alphabet Inc.", &["google", "alphabet", "youtube", "android"]),
    ("GOOG", "Alphabet Inc. Class C", &["google", "alphabet"]),
    ("AMZN", "Amazon.com Inc.", &["amazon", "aws", "prime"]),
    ("META", "Meta Platforms Inc.", &["meta", "facebook", "instagram", "whatsapp"]),
    ("NVDA", "NVIDIA Corporation", &["nvidia", "geforce", "gpu", "grafikkarte"]),
    ("TSLA", "Tesla Inc.", &["tesla", "elon", "musk", "elektroauto"]),
    ("AMD", "Advanced Micro Devices", &["amd", "ryzen", "radeon", "prozessor"]),
    ("INTC", "Intel Corporation", &["intel", "prozessor", "chip"]),
    ("NFLX", "Netflix Inc.", &["netflix", "streaming"]),
    ("ADBE", "Adobe Inc.", &["adobe", "photoshop", "creative"]),
    ("CRM", "Salesforce Inc.", &["salesforce", "crm", "cloud"]),
    ("ORCL", "Oracle Corporation", &["oracle", "database", "java"]),
    ("IBM", "IBM Corporation", &["ibm", "watson", "mainframe"]),
    ("CSCO", "Cisco Systems Inc.", &["cisco", "netzwerk", "router"]),
    ("QCOM", "Qualcomm Inc.", &["qualcomm", "snapdragon", "chip"]),
    ("TXN", "Texas Instruments", &["texas", "instruments", "halbleiter"]),
    ("AVGO", "Broadcom Inc.", &["broadcom", "chip", "halbleiter"]),
    ("MU", "Micron Technology", &["micron", "speicher", "memory"]),
    // Finance
    ("JPM", "JPMorgan Chase & Co.", &["jpmorgan", "chase", "bank"]),
    ("BAC", "Bank of America Corp.", &["bank", "america", "bofa"]),
    ("WFC", "Wells Fargo & Co.", &["wells", "fargo", "bank"]),
    ("GS", "Goldman Sachs Group", &["goldman", "sachs", "investment"]),
    ("MS", "Morgan Stanley", &["morgan", "stanley", "investment"]),
    ("V", "Visa Inc.", &["visa", "kreditkarte", "payment"]),
    ("MA", "Mastercard Inc.", &["mastercard", "kreditkarte", "payment"]),
    ("PYPL", "PayPal Holdings Inc.", &["paypal", "payment", "venmo"]),
    ("SQ", "Block Inc.", &["block", "square", "payment", "cash app"]),
    ("BLK", "BlackRock Inc.", &["blackrock", "asset", "etf"]),
    // Healthcare
    ("JNJ", "Johnson & Johnson", &["johnson", "pharma", "medizin"]),
    ("UNH", "UnitedHealth Group", &["united", "health", "versicherung"]),
    ("PFE", "Pfizer Inc.", &["pfizer", "pharma", "impfstoff"]),
    ("MRK", "Merck & Co.", &["merck", "pharma", "medikament"]),
    ("ABBV", "AbbVie Inc.", &["abbvie", "pharma", "humira"]),
    ("LLY", "Eli Lilly and Co.", &["lilly", "eli", "pharma", "diabetes"]),
    ("BMY", "Bristol-Myers Squibb", &["bristol", "myers", "squibb", "pharma"]),
    ("AMGN", "Amgen Inc.", &["amgen", "biotech", "pharma"]),
    ("GILD", "Gilead Sciences", &["gilead", "biotech", "hiv"]),
    ("MRNA", "Moderna Inc.", &["moderna", "mrna", "impfstoff", "vaccine"]),
    // Consumer
    ("WMT", "Walmart Inc.", &["walmart", "supermarkt", "retail"]),
    ("COST", "Costco Wholesale Corp.", &["costco", "großhandel", "retail"]),
    ("HD", "Home Depot Inc.", &["home", "depot", "baumarkt"]),
    ("TGT", "Target Corporation", &["target", "retail", "supermarkt"]),
    ("NKE", "Nike Inc.", &["nike", "sport", "schuhe", "sneaker"]),
    ("SBUX", "Starbucks Corporation", &["starbucks", "kaffee", "coffee"]),
    ("MCD", "McDonald's Corporation", &["mcdonald", "burger", "fastfood"]),
    ("KO", "Coca-Cola Company", &["coca", "cola", "coke", "getränk"]),
    ("PEP", "PepsiCo Inc.", &["pepsi", "cola", "frito", "lay"]),
    ("PG", "Procter & Gamble Co.", &["procter", "gamble", "pampers", "gillette"]),
    // Telecom & Media
    ("DIS", "Walt Disney Company", &["disney", "marvel", "pixar", "star wars"]),
    ("T", "AT&T Inc.", &["att", "at&t", "telekom"]),
    ("VZ", "Verizon Communications", &["verizon", "telekom", "mobilfunk"]),
    ("TMUS", "T-Mobile US Inc.", &["t-mobile", "tmobile", "mobilfunk"]),
    ("CMCSA", "Comcast Corporation", &["comcast", "nbc", "universal"]),
    ("PARA", "Paramount Global", &["paramount", "cbs", "film"]),
    ("WBD", "Warner Bros. Discovery", &["warner", "bros", "hbo", "discovery"]),
    // Automotive
    ("F", "Ford Motor Company", &["ford", "auto", "mustang"]),
    ("GM", "General Motors Co.", &["general", "motors", "chevrolet", "gmc"]),
    ("TM", "Toyota Motor Corp.", &["toyota", "auto", "lexus"]),
    ("HMC", "Honda Motor Co.", &["honda", "auto", "acura"]),
    ("RIVN", "Rivian Automotive", &["rivian", "elektroauto", "ev"]),
    ("LCID", "Lucid Group Inc.", &["lucid", "elektroauto", "ev"]),
    // Energy
    ("XOM", "Exxon Mobil Corp.", &["exxon", "mobil", "öl", "oil"]),
    ("CVX", "Chevron Corporation", &["chevron", "öl", "oil", "gas"]),
    ("COP", "ConocoPhillips", &["conoco", "phillips", "öl"]),
    ("SLB", "Schlumberger Ltd.", &["schlumberger", "öl", "drilling"]),
    // E-Commerce & Social
    ("SHOP", "Shopify Inc.", &["shopify", "ecommerce", "online shop"]),
    ("ETSY", "Etsy Inc.", &["etsy", "handmade", "marketplace"]),
    ("EBAY", "eBay Inc.", &["ebay", "auktion", "marketplace"]),
    ("PINS", "Pinterest Inc.", &["pinterest", "social", "bilder"]),
    ("SNAP", "Snap Inc.", &["snap", "snapchat", "social"]),
    ("TWTR", "Twitter Inc.", &["twitter", "x", "social"]),
    ("SPOT", "Spotify Technology", &["spotify", "musik", "streaming"]),
    ("RBLX", "Roblox Corporation", &["roblox", "gaming", "metaverse"]),
    ("U", "Unity Software Inc.", &["unity", "gaming", "engine"]),
    // Travel & Airlines
    ("DAL", "Delta Air Lines", &["delta", "airline", "flug"]),
    ("UAL", "United Airlines", &["united", "airline", "flug"]),
    ("AAL", "American Airlines", &["american", "airline", "flug"]),
    ("LUV", "Southwest Airlines", &["southwest", "airline", "flug"]),
    ("ABNB", "Airbnb Inc.", &["airbnb", "unterkunft", "travel"]),
    ("BKNG", "Booking Holdings", &["booking", "hotel", "travel"]),
    ("EXPE", "Expedia Group", &["expedia", "travel", "hotel"]),
    ("MAR", "Marriott International", &["marriott", "hotel"]),
    ("HLT", "Hilton Worldwide", &["hilton", "hotel"]),
    // Semiconductor & AI
    ("TSM", "Taiwan Semiconductor", &["taiwan", "tsmc", "chip", "semiconductor"]),
    ("ASML", "ASML Holding", &["asml", "lithographie", "chip"]),
    ("ARM", "Arm Holdings", &["arm", "chip", "prozessor", "mobile"]),
    ("MRVL", "Marvell Technology", &["marvell", "chip", "data center"]),
    ("LRCX", "Lam Research Corp.", &["lam", "research", "semiconductor"]),
    ("AMAT", "Applied Materials", &["applied", "materials", "semiconductor"]),
    ("KLAC", "KLA Corporation", &["kla", "semiconductor", "inspection"]),
    ("PLTR", "Palantir Technologies", &["palantir", "ai", "daten", "analytics"]),
    ("AI", "C3.ai Inc.", &["c3", "ai", "artificial intelligence"]),
    // Crypto & Fintech
    ("COIN", "Coinbase Global", &["coinbase", "crypto", "bitcoin", "exchange"]),
    ("MSTR", "MicroStrategy Inc.", &["microstrategy", "bitcoin", "btc"]),
    ("HOOD", "Robinhood Markets", &["robinhood", "trading", "broker"]),
    ("SOFI", "SoFi Technologies", &["sofi", "fintech", "bank"]),
    ("AFRM", "Affirm Holdings", &["affirm", "buy now pay later", "bnpl"]),
    // Indices & ETFs
    ("SPY", "SPDR S&P 500 ETF", &["spy", "s&p", "sp500", "index", "etf"]),
    ("QQQ", "Invesco QQQ Trust", &["qqq", "nasdaq", "tech", "etf"]),
    ("IWM", "iShares Russell 2000", &["iwm", "russell", "small cap", "etf"]),
    ("DIA", "SPDR Dow Jones ETF", &["dia", "dow", "jones", "etf"]),
    ("VOO", "Vanguard S&P 500 ETF", &["voo", "s&p", "vanguard", "etf"]),
    ("VTI", "Vanguard Total Stock", &["vti", "total", "market", "etf"]),
    ("ARKK", "ARK Innovation ETF", &["ark", "innovation", "cathie", "wood"]),
    // European
    ("SAP", "SAP SE", &["sap", "software", "erp", "deutschland"]),
    ("ASML", "ASML Holding NV", &["asml", "niederlande", "chip"]),
    ("NVO", "Novo Nordisk", &["novo", "nordisk", "ozempic", "diabetes"]),
];

/// # Summary
/// 只读的参考证券表。
///
/// # Invariants
/// - 启动时加载一次，进程生命周期内不再修改。
/// - 关键字统一为小写；允许重复代码，去重由排序器负责（先出现者优先）。
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable {
    entries: Vec<StockEntry>,
}

impl ReferenceTable {
    /// 使用内置参考表
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN_STOCKS
                .iter()
                .map(|(symbol, name, keywords)| StockEntry::new(symbol, name, keywords))
                .collect(),
        )
    }

    /// 由任意条目构造，关键字在此统一转为小写
    pub fn from_entries(entries: Vec<StockEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| StockEntry {
                keywords: entry.keywords.iter().map(|k| k.to_lowercase()).collect(),
                ..entry
            })
            .collect();
        Self { entries }
    }

    /// # Summary
    /// 从 JSON 文件加载参考表。
    ///
    /// # Logic
    /// 1. 文件内容为 `[{ "symbol", "name", "keywords" }]` 数组。
    /// 2. 空表视为配置错误。
    ///
    /// # Arguments
    /// * `path`: JSON 文件路径。
    ///
    /// # Returns
    /// 成功返回参考表，读取或解析失败返回 SearchError。
    pub fn load(path: &Path) -> Result<Self, SearchError> {
        let raw = std::fs::read_to_string(path)?;
        let entries: Vec<StockEntry> = serde_json::from_str(&raw)?;
        if entries.is_empty() {
            return Err(SearchError::EmptyTable(path.display().to_string()));
        }
        Ok(Self::from_entries(entries))
    }

    pub fn entries(&self) -> &[StockEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 去重后的代码数量
    pub fn distinct_symbols(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.symbol.to_uppercase())
            .collect::<HashSet<_>>()
            .len()
    }
}

impl Default for ReferenceTable {
    fn default() -> Self {
        Self::builtin()
    }
}
