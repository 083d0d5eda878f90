use serde::{Deserialize, Serialize};

use crate::{CalcError, Result, require_finite};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Length,
    Weight,
    Volume,
    Temperature,
    Area,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Length,
        Category::Weight,
        Category::Volume,
        Category::Temperature,
        Category::Area,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Length => "길이",
            Category::Weight => "무게",
            Category::Volume => "부피",
            Category::Temperature => "온도",
            Category::Area => "넓이",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Unit {
    pub key: &'static str,
    pub name: &'static str,
    pub category: Category,
    /// Multiplier into the category's base unit (m, kg, L, m²).
    /// `None` for temperature scales, which are affine.
    #[serde(skip)]
    pub to_base: Option<f64>,
    pub suggested: &'static [&'static str],
}

const fn linear(
    key: &'static str,
    name: &'static str,
    category: Category,
    to_base: f64,
    suggested: &'static [&'static str],
) -> Unit {
    Unit { key, name, category, to_base: Some(to_base), suggested }
}

const fn affine(key: &'static str, name: &'static str, suggested: &'static [&'static str]) -> Unit {
    Unit { key, name, category: Category::Temperature, to_base: None, suggested }
}

pub const UNITS: &[Unit] = &[
    linear("in", "인치 (in)", Category::Length, 0.0254, &["mm", "cm", "m"]),
    linear("ft", "피트 (ft)", Category::Length, 0.3048, &["m", "cm"]),
    linear("yd", "야드 (yd)", Category::Length, 0.9144, &["m"]),
    linear("mi", "마일 (mi)", Category::Length, 1609.344, &["km", "m"]),
    linear("mm", "밀리미터 (mm)", Category::Length, 0.001, &["in", "cm"]),
    linear("cm", "센티미터 (cm)", Category::Length, 0.01, &["in", "ft", "mm"]),
    linear("m", "미터 (m)", Category::Length, 1.0, &["ft", "yd", "km"]),
    linear("km", "킬로미터 (km)", Category::Length, 1000.0, &["mi", "m"]),
    linear("oz", "온스 (oz)", Category::Weight, 0.0283495, &["g"]),
    linear("lb", "파운드 (lb)", Category::Weight, 0.453592, &["kg", "g"]),
    linear("ton_us", "톤(미국) (ton)", Category::Weight, 907.185, &["kg", "ton"]),
    linear("g", "그램 (g)", Category::Weight, 0.001, &["oz", "kg"]),
    linear("kg", "킬로그램 (kg)", Category::Weight, 1.0, &["lb", "g"]),
    linear("ton", "톤 (t)", Category::Weight, 1000.0, &["ton_us", "kg"]),
    linear("fl_oz", "액량 온스 (fl oz)", Category::Volume, 0.0295735, &["ml"]),
    linear("cup", "컵 (cup)", Category::Volume, 0.236588, &["ml", "l"]),
    linear("pt", "파인트 (pt)", Category::Volume, 0.473176, &["ml", "l"]),
    linear("qt", "쿼트 (qt)", Category::Volume, 0.946353, &["l", "ml"]),
    linear("gal", "갤런 (gal)", Category::Volume, 3.78541, &["l"]),
    linear("ml", "밀리리터 (ml)", Category::Volume, 0.001, &["fl_oz", "cup", "l"]),
    linear("l", "리터 (L)", Category::Volume, 1.0, &["gal", "qt", "cup"]),
    linear("m3", "세제곱미터 (m³)", Category::Volume, 1000.0, &["l"]),
    affine("f", "화씨 (°F)", &["c"]),
    affine("c", "섭씨 (°C)", &["f", "k"]),
    affine("k", "켈빈 (K)", &["c"]),
    linear("sq_ft", "제곱피트 (sq ft)", Category::Area, 0.092903, &["sq_m"]),
    linear("sq_yd", "제곱야드 (sq yd)", Category::Area, 0.836127, &["sq_m"]),
    linear("acre", "에이커 (acre)", Category::Area, 4046.86, &["ha", "sq_m"]),
    linear("sq_mi", "제곱마일 (sq mi)", Category::Area, 2_589_988.0, &["sq_km"]),
    linear("sq_m", "제곱미터 (m²)", Category::Area, 1.0, &["sq_ft", "sq_yd"]),
    linear("ha", "헥타르 (ha)", Category::Area, 10_000.0, &["acre", "sq_m"]),
    linear("sq_km", "제곱킬로미터 (km²)", Category::Area, 1_000_000.0, &["sq_mi"]),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub category: Category,
    pub input: f64,
    pub output: f64,
    pub from_unit: &'static str,
    pub to_unit: &'static str,
}

pub fn find(key: &str) -> Result<&'static Unit> {
    UNITS
        .iter()
        .find(|u| u.key == key)
        .ok_or_else(|| CalcError::UnknownUnit(key.to_string()))
}

pub fn units_in(category: Category) -> impl Iterator<Item = &'static Unit> {
    UNITS.iter().filter(move |u| u.category == category)
}

pub fn convert(value: f64, from: &str, to: &str) -> Result<Conversion> {
    let value = require_finite("value", value)?;
    let from_unit = find(from)?;
    let to_unit = find(to)?;

    if from_unit.category != to_unit.category {
        return Err(CalcError::IncompatibleUnits { from: from.to_string(), to: to.to_string() });
    }

    let output = match (from_unit.to_base, to_unit.to_base) {
        (Some(from_factor), Some(to_factor)) => value * from_factor / to_factor,
        _ => convert_temperature(value, from_unit.key, to_unit.key),
    };

    Ok(Conversion {
        category: from_unit.category,
        input: value,
        output,
        from_unit: from_unit.name,
        to_unit: to_unit.name,
    })
}

fn convert_temperature(value: f64, from: &str, to: &str) -> f64 {
    let celsius = match from {
        "f" => (value - 32.0) * 5.0 / 9.0,
        "k" => value - 273.15,
        _ => value,
    };

    match to {
        "f" => celsius * 9.0 / 5.0 + 32.0,
        "k" => celsius + 273.15,
        _ => celsius,
    }
}
