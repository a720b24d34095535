/// Portal and report catalog constants shared across the crate.

// Portal endpoints
pub const PORTAL_BASE_URL: &str = "https://www.ccfgroup.com";
pub const PORTAL_LOGIN_URL: &str = "https://www.ccfgroup.com/member/member.php";

// Listing pages, one per report category
pub const BENZENE_DAILY_LISTING_URL: &str =
    "https://www.ccfgroup.com/newscenter/index.php?Class_ID=100000&subclassid=C00000";
pub const STYRENE_DAILY_LISTING_URL: &str =
    "https://www.ccfgroup.com/newscenter/index.php?Class_ID=100000&subclassid=F00000";
pub const STYRENE_WEEKLY_LISTING_URL: &str =
    "https://www.ccfgroup.com/newscenter/index.php?Class_ID=200000&subclassid=F00000";

// Link-title prefixes used to pick the report off a listing page
pub const BENZENE_DAILY_PREFIX: &str = "Benzene market daily";
pub const STYRENE_DAILY_PREFIX: &str = "Styrene monomer market daily";
pub const STYRENE_WEEKLY_PREFIX: &str = "Styrene monomer market weekly";

// Report slugs (CSV filenames, CLI output)
pub const BENZENE_DAILY_SLUG: &str = "benzene_daily";
pub const STYRENE_DAILY_SLUG: &str = "styrene_daily";
pub const STYRENE_WEEKLY_SLUG: &str = "styrene_weekly";

// Display headings in the inline report
pub const BENZENE_DAILY_HEADING: &str = "Benzene Market Daily";
pub const STYRENE_DAILY_HEADING: &str = "Styrene Monomer Market Daily";
pub const STYRENE_WEEKLY_HEADING: &str = "Styrene Monomer Market Weekly";

// HTTP session defaults
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Reports for "today" are not published yet, so resolution looks this far back.
pub const DEFAULT_OFFSET_DAYS: i64 = 1;

/// Format of the date token inside a listing link, e.g. "Nov 03, 2024".
pub const LINK_DATE_FORMAT: &str = "%b %d, %Y";

// Mail relay defaults
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

// Environment variables
pub const ENV_PORTAL_USERNAME: &str = "CCF_USERNAME";
pub const ENV_PORTAL_PASSWORD: &str = "CCF_PASSWORD";
pub const ENV_SENDER_EMAIL: &str = "SENDER_EMAIL";
pub const ENV_SENDER_PASSWORD: &str = "SENDER_PASSWORD";
pub const ENV_RECIPIENT_EMAIL: &str = "RECIPIENT_EMAIL";

pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Placeholder rendered for a category that produced no tables.
pub const NO_DATA_PLACEHOLDER: &str = "no data";
