use crate::protocol::Record;

/// Second pass over a decoded set: `time_sec` is relative to the earliest
/// `local_ts` of the whole set. Records without `local_ts` keep `None`.
pub fn assign_time_sec(records: &mut [Record]) {
    let Some(origin) = records.iter().filter_map(|r| r.local_ts).min() else {
        return;
    };

    for record in records.iter_mut() {
        record.time_sec = record
            .local_ts
            .map(|ts| (ts - origin) as f64 / 1000.0);
    }
}
