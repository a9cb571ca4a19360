use domain::AllowList;

#[test]
fn allow_list_exact_match() {
    let list = AllowList::from_iter(["temp1", "door1"]);

    assert!(list.accepts("temp1"));
    assert!(list.accepts("door1"));
    assert!(!list.accepts("temp"));
    assert!(!list.accepts("temp10"));
    assert!(!list.accepts(""));
}

#[test]
fn allow_list_is_case_sensitive() {
    let list = AllowList::from_iter(["Temp1"]);

    assert!(list.accepts("Temp1"));
    assert!(!list.accepts("temp1"));
    assert!(!list.accepts("TEMP1"));
}

#[test]
fn allow_list_order_and_duplicates_do_not_matter() {
    let ids = ["a", "b", "c"];
    let forward = AllowList::from_iter(ids);
    let reversed = AllowList::from_iter(ids.iter().rev().copied());
    let duplicated = AllowList::from_iter(["c", "a", "a", "b", "c"]);

    for candidate in ["a", "b", "c", "d", "A"] {
        assert_eq!(forward.accepts(candidate), reversed.accepts(candidate));
        assert_eq!(forward.accepts(candidate), duplicated.accepts(candidate));
    }
}

#[test]
fn empty_allow_list_rejects_everything() {
    let list = AllowList::default();

    assert!(list.is_empty());
    assert!(!list.accepts("temp1"));
}
