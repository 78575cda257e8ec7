//! Newest-wins merge of two friend lists keyed by `fid`.

use std::collections::HashMap;

use crate::types::Friend;

/// Merge `first` and `second` so each `fid` appears once.
///
/// Records are visited in `first ++ second` order. A later record replaces
/// the retained one only when its `update_date` is strictly newer, so on a
/// tie the record from `first` survives. Callers must not rely on the order of
/// the result; the projection imposes display order.
pub fn merge(first: Vec<Friend>, second: Vec<Friend>) -> Vec<Friend> {
    let mut slots: HashMap<String, usize> = HashMap::with_capacity(first.len() + second.len());
    let mut retained: Vec<Friend> = Vec::with_capacity(first.len() + second.len());

    for friend in first.into_iter().chain(second) {
        match slots.get(&friend.fid) {
            Some(&slot) => {
                if friend.update_date > retained[slot].update_date {
                    retained[slot] = friend;
                }
            }
            None => {
                slots.insert(friend.fid.clone(), retained.len());
                retained.push(friend);
            }
        }
    }

    retained
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{DateTime, TimeZone, Utc};

    use super::*;
    use crate::types::FriendStatus;

    fn friend(fid: &str, update_secs: i64) -> Friend {
        Friend {
            fid: fid.to_string(),
            name: format!("Tester{fid}"),
            status: FriendStatus::Accepted,
            is_top: false,
            update_date: Utc.timestamp_opt(update_secs, 0).unwrap(),
        }
    }

    fn fids(friends: &[Friend]) -> HashSet<&str> {
        friends.iter().map(|f| f.fid.as_str()).collect()
    }

    fn date_of<'a>(friends: &'a [Friend], fid: &str) -> Option<&'a DateTime<Utc>> {
        friends.iter().find(|f| f.fid == fid).map(|f| &f.update_date)
    }

    #[test]
    fn keeps_newer_friend_when_fid_duplicated() {
        let older = friend("001", 100);
        let newer = friend("001", 200);
        let merged = merge(vec![older], vec![newer.clone()]);
        assert_eq!(merged, vec![newer]);
    }

    #[test]
    fn keeps_newer_friend_regardless_of_side() {
        let older = friend("001", 100);
        let newer = friend("001", 200);
        let merged = merge(vec![newer.clone()], vec![older]);
        assert_eq!(merged, vec![newer]);
    }

    #[test]
    fn keeps_all_friends_when_no_duplicates() {
        let first = vec![friend("001", 100), friend("003", 300), friend("004", 400)];
        let second = vec![friend("002", 200), friend("005", 500), friend("006", 600)];
        let merged = merge(first, second);
        assert_eq!(merged.len(), 6);
        assert_eq!(
            fids(&merged),
            HashSet::from(["001", "002", "003", "004", "005", "006"])
        );
    }

    #[test]
    fn resolves_duplicates_for_multiple_fids() {
        let first = vec![
            friend("001", 100),
            friend("003", 350),
            friend("004", 400),
            friend("007", 700),
        ];
        let second = vec![
            friend("001", 150),
            friend("002", 200),
            friend("003", 300),
            friend("005", 500),
        ];
        let merged = merge(first, second);
        assert_eq!(
            fids(&merged),
            HashSet::from(["001", "002", "003", "004", "005", "007"])
        );
        assert_eq!(date_of(&merged, "001"), Some(&Utc.timestamp_opt(150, 0).unwrap()));
        assert_eq!(date_of(&merged, "003"), Some(&Utc.timestamp_opt(350, 0).unwrap()));
    }

    #[test]
    fn tie_keeps_first_record() {
        let mut from_first = friend("001", 100);
        from_first.name = "first".to_string();
        let mut from_second = friend("001", 100);
        from_second.name = "second".to_string();

        let merged = merge(vec![from_first], vec![from_second]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "first");
    }

    #[test]
    fn duplicates_within_one_list_are_resolved() {
        let merged = merge(vec![friend("001", 100), friend("001", 300), friend("001", 200)], vec![]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].update_date, Utc.timestamp_opt(300, 0).unwrap());
    }

    #[test]
    fn malformed_date_loses_to_any_real_date() {
        let mut stale = friend("001", 0);
        stale.update_date = DateTime::<Utc>::MIN_UTC;
        let fresh = friend("001", 0);
        let merged = merge(vec![stale], vec![fresh.clone()]);
        assert_eq!(merged, vec![fresh]);
    }

    #[test]
    fn empty_inputs_yield_empty_output() {
        assert!(merge(Vec::new(), Vec::new()).is_empty());
    }
}
