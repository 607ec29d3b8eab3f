use chrono::{DateTime, Utc};

/// Human age of a timestamp, e.g. snapshot freshness in logs.
pub fn age(since: DateTime<Utc>) -> String {
    age_at(since, Utc::now())
}

pub fn age_at(since: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now - since;

    if diff.num_milliseconds() < 0 {
        return "in the future".to_string();
    }
    if diff.num_seconds() < 1 {
        return format!("{}ms", diff.num_milliseconds());
    }

    let mins = diff.num_minutes();
    let secs = diff.num_seconds() % 60;

    if mins == 0 {
        format!("{}s", secs)
    } else {
        format!("{:02}m {:02}s", mins, secs)
    }
}
