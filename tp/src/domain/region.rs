//! Region and prefecture table
//!
//! Japan's 47 prefectures grouped into the 8 traditional regions. Area search
//! and area validation are both scoped by this table.

use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Geographic region grouping prefectures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Region {
    Hokkaido,
    Tohoku,
    Kanto,
    Chubu,
    Kansai,
    Chugoku,
    Shikoku,
    Kyushu,
}

impl Region {
    /// All regions, north to south
    pub const ALL: [Region; 8] = [
        Region::Hokkaido,
        Region::Tohoku,
        Region::Kanto,
        Region::Chubu,
        Region::Kansai,
        Region::Chugoku,
        Region::Shikoku,
        Region::Kyushu,
    ];

    /// English display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hokkaido => "Hokkaido",
            Self::Tohoku => "Tohoku",
            Self::Kanto => "Kanto",
            Self::Chubu => "Chubu",
            Self::Kansai => "Kansai",
            Self::Chugoku => "Chugoku",
            Self::Shikoku => "Shikoku",
            Self::Kyushu => "Kyushu",
        }
    }

    /// Japanese display name
    pub fn name_ja(&self) -> &'static str {
        match self {
            Self::Hokkaido => "北海道",
            Self::Tohoku => "東北",
            Self::Kanto => "関東",
            Self::Chubu => "中部",
            Self::Kansai => "近畿",
            Self::Chugoku => "中国",
            Self::Shikoku => "四国",
            Self::Kyushu => "九州",
        }
    }

    /// Prefectures belonging to this region, in table order
    pub fn prefectures(&self) -> impl Iterator<Item = Prefecture> + '_ {
        PREFECTURES.iter().copied().filter(move |p| p.region == *self)
    }

    /// Whether the given prefecture is part of this region
    pub fn contains(&self, prefecture: &Prefecture) -> bool {
        prefecture.region == *self
    }

    /// Look up a region by English (case-insensitive) or Japanese name
    pub fn lookup(name: &str) -> Option<Self> {
        let name = name.trim();
        let found = Self::ALL
            .iter()
            .copied()
            .find(|r| r.name().eq_ignore_ascii_case(name) || r.name_ja() == name);
        debug!(%name, ?found, "Region::lookup");
        found
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Region {
    type Err = UnknownArea;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| UnknownArea::Region(s.to_string()))
    }
}

impl TryFrom<String> for Region {
    type Error = UnknownArea;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.name().to_string()
    }
}

/// A prefecture and the region it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Prefecture {
    name: &'static str,
    name_ja: &'static str,
    region: Region,
}

impl Prefecture {
    const fn new(name: &'static str, name_ja: &'static str, region: Region) -> Self {
        Self { name, name_ja, region }
    }

    /// English display name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Japanese display name, including the 都/道/府/県 suffix
    pub fn name_ja(&self) -> &'static str {
        self.name_ja
    }

    /// Region this prefecture belongs to
    pub fn region(&self) -> Region {
        self.region
    }

    /// All 47 prefectures
    pub fn all() -> &'static [Prefecture] {
        &PREFECTURES
    }

    /// Look up a prefecture by English (case-insensitive) or Japanese name
    pub fn lookup(name: &str) -> Option<Self> {
        let name = name.trim();
        let found = PREFECTURES
            .iter()
            .copied()
            .find(|p| p.name.eq_ignore_ascii_case(name) || p.name_ja == name);
        debug!(%name, found = ?found.map(|p| p.name), "Prefecture::lookup");
        found
    }
}

impl fmt::Display for Prefecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl FromStr for Prefecture {
    type Err = UnknownArea;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| UnknownArea::Prefecture(s.to_string()))
    }
}

impl TryFrom<String> for Prefecture {
    type Error = UnknownArea;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Prefecture> for String {
    fn from(prefecture: Prefecture) -> Self {
        prefecture.name.to_string()
    }
}

// Written by hand: the table holds `&'static str`, which a derive would tie to `'de: 'static`.
impl<'de> Deserialize<'de> for Prefecture {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(de::Error::custom)
    }
}

/// Name did not match any known region or prefecture
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnknownArea {
    #[error("Unknown region: '{0}'")]
    Region(String),

    #[error("Unknown prefecture: '{0}'")]
    Prefecture(String),
}

const PREFECTURES: [Prefecture; 47] = [
    Prefecture::new("Hokkaido", "北海道", Region::Hokkaido),
    Prefecture::new("Aomori", "青森県", Region::Tohoku),
    Prefecture::new("Iwate", "岩手県", Region::Tohoku),
    Prefecture::new("Miyagi", "宮城県", Region::Tohoku),
    Prefecture::new("Akita", "秋田県", Region::Tohoku),
    Prefecture::new("Yamagata", "山形県", Region::Tohoku),
    Prefecture::new("Fukushima", "福島県", Region::Tohoku),
    Prefecture::new("Ibaraki", "茨城県", Region::Kanto),
    Prefecture::new("Tochigi", "栃木県", Region::Kanto),
    Prefecture::new("Gunma", "群馬県", Region::Kanto),
    Prefecture::new("Saitama", "埼玉県", Region::Kanto),
    Prefecture::new("Chiba", "千葉県", Region::Kanto),
    Prefecture::new("Tokyo", "東京都", Region::Kanto),
    Prefecture::new("Kanagawa", "神奈川県", Region::Kanto),
    Prefecture::new("Niigata", "新潟県", Region::Chubu),
    Prefecture::new("Toyama", "富山県", Region::Chubu),
    Prefecture::new("Ishikawa", "石川県", Region::Chubu),
    Prefecture::new("Fukui", "福井県", Region::Chubu),
    Prefecture::new("Yamanashi", "山梨県", Region::Chubu),
    Prefecture::new("Nagano", "長野県", Region::Chubu),
    Prefecture::new("Gifu", "岐阜県", Region::Chubu),
    Prefecture::new("Shizuoka", "静岡県", Region::Chubu),
    Prefecture::new("Aichi", "愛知県", Region::Chubu),
    Prefecture::new("Mie", "三重県", Region::Kansai),
    Prefecture::new("Shiga", "滋賀県", Region::Kansai),
    Prefecture::new("Kyoto", "京都府", Region::Kansai),
    Prefecture::new("Osaka", "大阪府", Region::Kansai),
    Prefecture::new("Hyogo", "兵庫県", Region::Kansai),
    Prefecture::new("Nara", "奈良県", Region::Kansai),
    Prefecture::new("Wakayama", "和歌山県", Region::Kansai),
    Prefecture::new("Tottori", "鳥取県", Region::Chugoku),
    Prefecture::new("Shimane", "島根県", Region::Chugoku),
    Prefecture::new("Okayama", "岡山県", Region::Chugoku),
    Prefecture::new("Hiroshima", "広島県", Region::Chugoku),
    Prefecture::new("Yamaguchi", "山口県", Region::Chugoku),
    Prefecture::new("Tokushima", "徳島県", Region::Shikoku),
    Prefecture::new("Kagawa", "香川県", Region::Shikoku),
    Prefecture::new("Ehime", "愛媛県", Region::Shikoku),
    Prefecture::new("Kochi", "高知県", Region::Shikoku),
    Prefecture::new("Fukuoka", "福岡県", Region::Kyushu),
    Prefecture::new("Saga", "佐賀県", Region::Kyushu),
    Prefecture::new("Nagasaki", "長崎県", Region::Kyushu),
    Prefecture::new("Kumamoto", "熊本県", Region::Kyushu),
    Prefecture::new("Oita", "大分県", Region::Kyushu),
    Prefecture::new("Miyazaki", "宮崎県", Region::Kyushu),
    Prefecture::new("Kagoshima", "鹿児島県", Region::Kyushu),
    Prefecture::new("Okinawa", "沖縄県", Region::Kyushu),
];
