use anyhow::{Result, bail};
use chrono::{Datelike, NaiveDate};
use gyemini_types::models::Ipo;

struct Listing {
    company_name: &'static str,
    subscription_start: &'static str,
    subscription_end: &'static str,
    listing_date: &'static str,
    offering_price: u64,
    market: &'static str,
    lead_underwriter: &'static str,
    offering_shares: u64,
}

// Sample calendar; there is no free upstream for the KRX offering schedule.
const SCHEDULE: &[Listing] = &[
    Listing {
        company_name: "AI솔루션",
        subscription_start: "2025-11-18",
        subscription_end: "2025-11-19",
        listing_date: "2025-11-28",
        offering_price: 25_000,
        market: "KOSDAQ",
        lead_underwriter: "한국투자증권",
        offering_shares: 5_000_000,
    },
    Listing {
        company_name: "그린에너지",
        subscription_start: "2025-11-25",
        subscription_end: "2025-11-26",
        listing_date: "2025-12-05",
        offering_price: 18_000,
        market: "KOSDAQ",
        lead_underwriter: "NH투자증권",
        offering_shares: 3_500_000,
    },
    Listing {
        company_name: "바이오메드",
        subscription_start: "2025-11-27",
        subscription_end: "2025-11-28",
        listing_date: "2025-12-09",
        offering_price: 32_000,
        market: "KOSPI",
        lead_underwriter: "삼성증권",
        offering_shares: 2_800_000,
    },
    Listing {
        company_name: "스마트물류",
        subscription_start: "2025-12-02",
        subscription_end: "2025-12-03",
        listing_date: "2025-12-12",
        offering_price: 22_000,
        market: "KOSDAQ",
        lead_underwriter: "미래에셋증권",
        offering_shares: 4_200_000,
    },
    Listing {
        company_name: "클라우드테크",
        subscription_start: "2025-12-09",
        subscription_end: "2025-12-10",
        listing_date: "2025-12-19",
        offering_price: 28_000,
        market: "KOSDAQ",
        lead_underwriter: "키움증권",
        offering_shares: 3_000_000,
    },
    Listing {
        company_name: "헬스케어플랫폼",
        subscription_start: "2025-12-16",
        subscription_end: "2025-12-17",
        listing_date: "2025-12-26",
        offering_price: 19_500,
        market: "KOSDAQ",
        lead_underwriter: "KB증권",
        offering_shares: 3_800_000,
    },
    Listing {
        company_name: "반도체소재",
        subscription_start: "2025-12-23",
        subscription_end: "2025-12-24",
        listing_date: "2026-01-02",
        offering_price: 35_000,
        market: "KOSPI",
        lead_underwriter: "메리츠증권",
        offering_shares: 2_500_000,
    },
];

/// The full sample schedule with ids assigned in order.
pub fn schedule() -> Result<Vec<Ipo>> {
    SCHEDULE
        .iter()
        .enumerate()
        .map(|(i, l)| {
            Ok(Ipo {
                id: i as u32 + 1,
                company_name: l.company_name.to_string(),
                subscription_start: parse(l.subscription_start)?,
                subscription_end: parse(l.subscription_end)?,
                listing_date: parse(l.listing_date)?,
                offering_price: l.offering_price,
                market: l.market.to_string(),
                lead_underwriter: l.lead_underwriter.to_string(),
                offering_shares: l.offering_shares,
            })
        })
        .collect()
}

/// Offerings with any milestone (subscription start/end or listing) in the month.
pub fn for_month(year: i32, month: u32) -> Result<Vec<Ipo>> {
    if !(1..=12).contains(&month) {
        bail!("month must be between 1 and 12");
    }

    let in_month = |d: NaiveDate| d.year() == year && d.month() == month;
    Ok(schedule()?
        .into_iter()
        .filter(|ipo| {
            in_month(ipo.subscription_start)
                || in_month(ipo.subscription_end)
                || in_month(ipo.listing_date)
        })
        .collect())
}

fn parse(date: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(date, "%Y-%m-%d")?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_parses() {
        let all = schedule().unwrap();
        assert_eq!(all.len(), 7);
        assert_eq!(all[0].id, 1);
        assert_eq!(all[6].company_name, "반도체소재");
    }

    #[test]
    fn listing_in_next_month_counts() {
        let november: Vec<_> = for_month(2025, 11).unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(november, vec![1, 2, 3]);

        // 그린에너지 and 바이오메드 subscribe in November but list in December
        let december: Vec<_> = for_month(2025, 12).unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(december, vec![2, 3, 4, 5, 6, 7]);

        let january = for_month(2026, 1).unwrap();
        assert_eq!(january.len(), 1);
        assert_eq!(january[0].company_name, "반도체소재");
    }

    #[test]
    fn empty_and_invalid_months() {
        assert!(for_month(2024, 11).unwrap().is_empty());
        assert!(for_month(2025, 0).is_err());
        assert!(for_month(2025, 13).is_err());
    }
}
