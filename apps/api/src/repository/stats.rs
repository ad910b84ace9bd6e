use serde::Serialize;

/// Raw per-status counts as reported by a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: u64,
    pub applied: u64,
    pub interview: u64,
    pub offer: u64,
}

/// Dashboard statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: u64,
    pub interviews: u64,
    pub offers: u64,
    pub response_rate: u64,
}

impl Stats {
    pub fn from_counts(counts: &StatusCounts) -> Self {
        Stats {
            total: counts.total,
            interviews: counts.interview,
            offers: counts.offer,
            response_rate: response_rate(counts.applied, counts.interview, counts.offer),
        }
    }
}

/// `(interviews + offers) / applied` as a whole percentage, rounded half-up.
/// Zero when nothing is in the `applied` state. May exceed 100.
pub fn response_rate(applied: u64, interviews: u64, offers: u64) -> u64 {
    if applied == 0 {
        return 0;
    }
    let responded = interviews + offers;
    (responded * 200 + applied) / (applied * 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_rate_zero_when_nothing_applied() {
        assert_eq!(response_rate(0, 4, 2), 0);
    }

    #[test]
    fn test_response_rate_three_applied_two_interviews_one_offer() {
        assert_eq!(response_rate(3, 2, 1), 100);
    }

    #[test]
    fn test_response_rate_rounds_half_up() {
        // 1/8 = 12.5%
        assert_eq!(response_rate(8, 1, 0), 13);
        // 1/3 = 33.3%
        assert_eq!(response_rate(3, 1, 0), 33);
        // 2/3 = 66.7%
        assert_eq!(response_rate(3, 0, 2), 67);
    }

    #[test]
    fn test_response_rate_can_exceed_100() {
        assert_eq!(response_rate(1, 2, 1), 300);
    }

    #[test]
    fn test_stats_from_counts() {
        let stats = Stats::from_counts(&StatusCounts {
            total: 10,
            applied: 3,
            interview: 2,
            offer: 1,
        });
        assert_eq!(
            stats,
            Stats {
                total: 10,
                interviews: 2,
                offers: 1,
                response_rate: 100
            }
        );
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let json = serde_json::to_value(Stats::from_counts(&StatusCounts::default())).unwrap();
        assert_eq!(json["responseRate"], 0);
        assert_eq!(json["total"], 0);
    }
}
