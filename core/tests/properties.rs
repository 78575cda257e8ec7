//! Property tests for the pure list transforms.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{TimeZone, Utc};
use friends_core::{merge, normalize_query, project, search, DisplayState, Friend, FriendStatus};
use proptest::prelude::*;

fn friend_with_fid(fid: String) -> impl Strategy<Value = Friend> {
    ("[a-c王小]{0,3}", 0i64..3, any::<bool>(), 0i64..5).prop_map(move |(name, status, is_top, day)| Friend {
        fid: fid.clone(),
        name,
        status: FriendStatus::from_code(status),
        is_top,
        update_date: Utc.timestamp_opt(day * 86_400, 0).unwrap(),
    })
}

/// Friends drawn from a small fid pool so duplicates and date ties are common.
fn friend() -> impl Strategy<Value = Friend> {
    "00[0-5]".prop_flat_map(friend_with_fid)
}

fn friends() -> impl Strategy<Value = Vec<Friend>> {
    prop::collection::vec(friend(), 0..10)
}

/// A list with unique fids, all starting with `prefix`.
fn unique_friends(prefix: &'static str) -> impl Strategy<Value = Vec<Friend>> {
    prop::collection::btree_set("[0-9]{2}", 0..8).prop_flat_map(move |suffixes| {
        suffixes
            .into_iter()
            .map(|suffix| friend_with_fid(format!("{prefix}{suffix}")))
            .collect::<Vec<_>>()
    })
}

fn by_fid(friends: &[Friend]) -> BTreeMap<String, Friend> {
    friends.iter().map(|f| (f.fid.clone(), f.clone())).collect()
}

/// Reference answer: the first record carrying the newest date for each fid.
fn expected_winners(first: &[Friend], second: &[Friend]) -> BTreeMap<String, Friend> {
    let mut winners: BTreeMap<String, Friend> = BTreeMap::new();
    for friend in first.iter().chain(second) {
        let replace = match winners.get(&friend.fid) {
            Some(kept) => friend.update_date > kept.update_date,
            None => true,
        };
        if replace {
            winners.insert(friend.fid.clone(), friend.clone());
        }
    }
    winners
}

proptest! {
    #[test]
    fn merge_keeps_one_record_per_fid(a in friends(), b in friends()) {
        let merged = merge(a.clone(), b.clone());
        let unique: HashSet<&str> = merged.iter().map(|f| f.fid.as_str()).collect();
        prop_assert_eq!(unique.len(), merged.len());

        let all: HashSet<&str> = a.iter().chain(&b).map(|f| f.fid.as_str()).collect();
        prop_assert_eq!(unique, all);
    }

    #[test]
    fn merge_keeps_first_newest_record(a in friends(), b in friends()) {
        let merged = merge(a.clone(), b.clone());
        prop_assert_eq!(by_fid(&merged), expected_winners(&a, &b));
    }

    #[test]
    fn merge_of_disjoint_lists_is_their_union(a in unique_friends("a"), b in unique_friends("b")) {
        let merged = merge(a.clone(), b.clone());
        let mut union = by_fid(&a);
        union.extend(by_fid(&b));
        prop_assert_eq!(merged.len(), a.len() + b.len());
        prop_assert_eq!(by_fid(&merged), union);
    }

    #[test]
    fn merge_is_idempotent(a in friends(), b in friends()) {
        let once = merge(a, b.clone());
        let twice = merge(once.clone(), b);
        prop_assert_eq!(by_fid(&twice), by_fid(&once));
    }

    #[test]
    fn merge_retains_same_fids_in_either_order(a in friends(), b in friends()) {
        let ab: HashSet<String> = merge(a.clone(), b.clone()).into_iter().map(|f| f.fid).collect();
        let ba: HashSet<String> = merge(b, a).into_iter().map(|f| f.fid).collect();
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn search_with_blank_query_is_identity(list in friends(), blank in "[ \t\n]{0,4}") {
        prop_assert_eq!(search(&blank, &list), list);
    }

    #[test]
    fn search_ignores_whitespace_in_query(list in friends(), query in "[a-c王小]{1,2}", pad in "[ \t]{1,3}") {
        let padded: String = query.chars().flat_map(|c| [c].into_iter().chain(pad.chars())).collect();
        prop_assert_eq!(normalize_query(&padded), query.clone());
        prop_assert_eq!(search(&padded, &list), search(&query, &list));
    }

    #[test]
    fn search_returns_ordered_subsequence(list in friends(), query in "[a-c王小]{1,2}") {
        let found = search(&query, &list);
        prop_assert!(found.iter().all(|f| f.name.to_lowercase().contains(&query.to_lowercase())));

        let mut rest = list.iter();
        for hit in &found {
            prop_assert!(rest.any(|f| f == hit));
        }
    }

    #[test]
    fn projection_partitions_and_orders(list in friends()) {
        match project(&list) {
            DisplayState::Empty => prop_assert!(list.is_empty()),
            DisplayState::Content { received_invitations, friends } => {
                prop_assert_eq!(received_invitations.len() + friends.len(), list.len());
                prop_assert!(received_invitations.iter().all(|f| f.status == FriendStatus::ReceivedInvitation));
                prop_assert!(received_invitations.windows(2).all(|w| w[0].fid <= w[1].fid));

                let rank = |f: &Friend| match (f.status, f.is_top) {
                    (FriendStatus::SentInvitation, _) => 0,
                    (FriendStatus::Accepted, true) => 1,
                    _ => 2,
                };
                prop_assert!(friends.iter().all(|f| f.status != FriendStatus::ReceivedInvitation));
                prop_assert!(friends
                    .windows(2)
                    .all(|w| (rank(&w[0]), &w[0].fid) <= (rank(&w[1]), &w[1].fid)));
            }
            other => prop_assert!(false, "unexpected state {:?}", other),
        }
    }
}

#[test]
fn merged_fixture_scenario_has_three_friends() {
    let day = |d: i64| Utc.timestamp_opt(d * 86_400, 0).unwrap();
    let accepted = |fid: &str, d: i64| Friend {
        fid: fid.to_string(),
        name: fid.to_string(),
        status: FriendStatus::Accepted,
        is_top: false,
        update_date: day(d),
    };
    let mut sent = accepted("003", 1);
    sent.status = FriendStatus::SentInvitation;

    let merged = merge(vec![accepted("001", 1), accepted("002", 1)], vec![accepted("001", 2), sent]);
    let dates: HashMap<&str, _> = merged.iter().map(|f| (f.fid.as_str(), f.update_date)).collect();
    assert_eq!(dates.len(), 3);
    assert_eq!(dates["001"], day(2));

    let DisplayState::Content { received_invitations, friends } = project(&merged) else {
        panic!("expected content");
    };
    assert!(received_invitations.is_empty());
    assert_eq!(friends.len(), 3);
}
