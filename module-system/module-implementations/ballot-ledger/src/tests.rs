use ballot_modules_api::{
    Address, Context, DefaultContext, MemStorage, Module, ModuleInfo, StateMap, WorkingSet,
};

use super::call::CallMessage;
use super::{Ballot, BallotConfig, BallotError, BallotLedger, Candidate};

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn setup(candidates: &[&str]) -> (Ballot<DefaultContext>, Address, WorkingSet<MemStorage>) {
    let owner = Address::from([1; 32]);
    let ballot = Ballot::<DefaultContext>::default();
    let mut working_set = WorkingSet::new(MemStorage::new());

    let config = BallotConfig {
        owner,
        candidates: names(candidates),
    };
    ballot.genesis(&config, &mut working_set).unwrap();

    (ballot, owner, working_set)
}

fn ballot_error(err: anyhow::Error) -> BallotError {
    err.downcast::<BallotError>().unwrap()
}

#[test]
fn test_genesis_assigns_sequential_ids() {
    let (ballot, owner, working_set) = setup(&["Alice", "Bob", "Carol"]);

    assert_eq!(ballot.candidates_count(&working_set), 3);
    assert_eq!(ballot.owner(&working_set).unwrap(), owner);

    let candidates = ballot.get_candidates(&working_set);
    assert_eq!(candidates.ids, vec![1, 2, 3]);
    assert_eq!(candidates.names, names(&["Alice", "Bob", "Carol"]));
    assert_eq!(candidates.vote_counts, vec![0, 0, 0]);
    assert_eq!(working_set.events()[0].key(), "Ballot: genesis");
}

#[test]
fn test_genesis_rejects_bad_configs() {
    let ballot = Ballot::<DefaultContext>::default();
    let owner = Address::from([1; 32]);

    for candidates in [vec![], names(&["Alice", ""])] {
        let mut working_set = WorkingSet::new(MemStorage::new());
        let config = BallotConfig { owner, candidates };
        let err = ballot.init_module(&config, &mut working_set).unwrap_err();
        assert!(matches!(ballot_error(err), BallotError::InvalidConfig(_)));
        assert_eq!(ballot.candidates_count(&working_set), 0);
    }
}

#[test]
fn test_genesis_runs_once() {
    let (ballot, owner, mut working_set) = setup(&["Alice"]);

    let config = BallotConfig::<DefaultContext>::reference(owner);
    let err = ballot.init_module(&config, &mut working_set).unwrap_err();

    assert!(matches!(ballot_error(err), BallotError::InvalidConfig(_)));
    assert_eq!(ballot.candidates_count(&working_set), 1);
}

#[test]
fn test_vote_marks_participant_and_counts_once() {
    let (ballot, _, mut working_set) = setup(&["Alice", "Bob"]);
    let voter = Address::from([7; 32]);
    let context = DefaultContext::new(voter);

    assert!(!ballot.has_voted(&voter, &working_set));
    ballot
        .call(CallMessage::Vote { candidate_id: 1 }, &context, &mut working_set)
        .unwrap();

    assert!(ballot.has_voted(&voter, &working_set));
    assert_eq!(
        ballot.candidate(1, &working_set).unwrap(),
        Candidate {
            id: 1,
            name: "Alice".to_owned(),
            vote_count: 1
        }
    );

    let err = ballot.vote(2, &context, &mut working_set).unwrap_err();
    assert_eq!(ballot_error(err), BallotError::AlreadyVoted);
    assert_eq!(ballot.get_candidates(&working_set).vote_counts, vec![1, 0]);
}

#[test]
fn test_repeat_voter_with_invalid_id_reports_already_voted() {
    let (ballot, _, mut working_set) = setup(&["Alice"]);
    let context = DefaultContext::new(Address::from([7; 32]));

    ballot.vote(1, &context, &mut working_set).unwrap();
    let err = ballot.vote(99, &context, &mut working_set).unwrap_err();

    assert_eq!(ballot_error(err), BallotError::AlreadyVoted);
}

#[test]
fn test_vote_for_unknown_candidate_changes_nothing() {
    let (ballot, _, mut working_set) = setup(&["Alice", "Bob"]);
    let voter = Address::from([7; 32]);
    let context = DefaultContext::new(voter);

    for candidate_id in [0, 3, u64::MAX] {
        let err = ballot
            .vote(candidate_id, &context, &mut working_set)
            .unwrap_err();
        assert_eq!(ballot_error(err), BallotError::InvalidCandidate(candidate_id));
    }

    assert!(!ballot.has_voted(&voter, &working_set));
    assert_eq!(ballot.get_candidates(&working_set).vote_counts, vec![0, 0]);
}

#[test]
fn test_only_owner_adds_candidates() {
    let (ballot, owner, mut working_set) = setup(&["Alice"]);

    let outsider = DefaultContext::new(Address::from([9; 32]));
    let err = ballot
        .add_candidate("Mallory".to_owned(), &outsider, &mut working_set)
        .unwrap_err();
    assert_eq!(ballot_error(err), BallotError::Unauthorized);
    assert_eq!(ballot.candidates_count(&working_set), 1);

    let owner = DefaultContext::new(owner);
    let err = ballot
        .add_candidate(String::new(), &owner, &mut working_set)
        .unwrap_err();
    assert!(matches!(ballot_error(err), BallotError::InvalidInput(_)));

    let id = ballot
        .add_candidate("Dave".to_owned(), &owner, &mut working_set)
        .unwrap();
    assert_eq!(id, 2);
    assert_eq!(ballot.candidate(2, &working_set).unwrap().name, "Dave");
}

#[test]
fn test_unauthorized_is_reported_before_invalid_input() {
    let (ballot, _, mut working_set) = setup(&["Alice"]);
    let outsider = DefaultContext::new(Address::from([9; 32]));

    let err = ballot
        .add_candidate(String::new(), &outsider, &mut working_set)
        .unwrap_err();
    assert_eq!(ballot_error(err), BallotError::Unauthorized);
}

#[test]
fn test_winner_ties_go_to_lowest_id() {
    let (ballot, _, mut working_set) = setup(&["A", "B", "C"]);

    for (seed, candidate_id) in [(10, 2), (11, 3), (12, 3), (13, 2)] {
        let context = DefaultContext::new(Address::from([seed; 32]));
        ballot.vote(candidate_id, &context, &mut working_set).unwrap();
    }

    assert_eq!(ballot.get_candidates(&working_set).vote_counts, vec![0, 2, 2]);
    let winner = ballot.get_winner(&working_set).unwrap();
    assert_eq!((winner.id, winner.name.as_str(), winner.vote_count), (2, "B", 2));
}

#[test]
fn test_winner_without_votes_is_first_candidate() {
    let (ballot, _, working_set) = setup(&["A", "B"]);

    assert_eq!(ballot.get_winner(&working_set).unwrap().id, 1);
}

#[test]
fn test_queries_on_empty_registry() {
    let ballot = Ballot::<DefaultContext>::default();
    let working_set = WorkingSet::new(MemStorage::new());

    assert_eq!(
        ballot.get_winner(&working_set),
        Err(BallotError::NoCandidates)
    );
    assert_eq!(
        ballot.candidate(1, &working_set),
        Err(BallotError::InvalidCandidate(1))
    );
    assert!(ballot.get_candidates(&working_set).ids.is_empty());
    assert!(ballot.owner(&working_set).is_err());
}

#[test]
fn test_events_describe_accepted_calls() {
    let (ballot, owner, mut working_set) = setup(&["Alice"]);
    working_set.take_events();

    let owner = DefaultContext::new(owner);
    ballot
        .call(
            CallMessage::AddCandidate {
                name: "Bob".to_owned(),
            },
            &owner,
            &mut working_set,
        )
        .unwrap();
    ballot
        .call(CallMessage::Vote { candidate_id: 2 }, &owner, &mut working_set)
        .unwrap();

    let keys: Vec<_> = working_set.events().iter().map(|e| e.key().to_owned()).collect();
    assert_eq!(keys, vec!["Ballot: add_candidate", "Ballot: vote"]);
    assert_eq!(working_set.events()[0].value(), "Candidate was added: 2");
}

#[test]
fn test_state_lives_under_module_prefix() {
    let ballot = Ballot::<DefaultContext>::default();
    let prefix = ballot.prefix();

    for field in [
        ballot.owner.prefix(),
        ballot.candidates.prefix(),
        ballot.participants.prefix(),
    ] {
        assert!(field.as_bytes().starts_with(prefix.as_bytes()));
        assert_ne!(field, &prefix);
    }
    assert!(prefix.to_string().ends_with("/Ballot/\""));
}

#[test]
fn test_ledger_keeps_working_after_a_panicking_call() {
    let storage = MemStorage::new();
    let owner = Address::from([1; 32]);
    let ledger =
        BallotLedger::<DefaultContext>::construct(storage.clone(), &BallotConfig::reference(owner))
            .unwrap();

    // A participant record that does not decode as a flag.
    let corrupted = Address::from([7; 32]);
    let mut working_set = WorkingSet::new(storage);
    StateMap::<Address, ()>::new(ledger.module().participants.prefix().clone()).set(
        &corrupted,
        &(),
        &mut working_set,
    );
    working_set.checkpoint().commit().unwrap();

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        ledger.vote(1, &corrupted)
    }));
    assert!(outcome.is_err());

    ledger.vote(1, &Address::from([8; 32])).unwrap();
    assert_eq!(ledger.get_candidates().vote_counts, vec![1, 0, 0]);
}
