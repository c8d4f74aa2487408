use gopack_core::graph::Graph;
use gopack_resolver::Pipeline;
use gopack_testkit::{RecordingRetriever, ScratchProject};

#[test]
fn single_dep_with_branch_is_fetched_and_pinned() {
    let project = ScratchProject::new(
        "[deps.foo]\nimport = \"example.org/foo\"\nbranch = \"dev\"\n",
    );
    let retriever = RecordingRetriever::new();
    let (deps, graph) = project.model().unwrap();

    let report = Pipeline::new(&project.session, &retriever, true)
        .resolve(deps, graph)
        .unwrap();

    assert_eq!(retriever.retrieved(), ["example.org/foo"]);
    assert_eq!(
        retriever.checkouts(),
        vec![("example.org/foo".to_string(), "branch dev".to_string())]
    );
    assert_eq!(report.retrieved_count(), 1);
    assert_eq!(report.visits()[0].checkout.as_deref(), Some("branch dev"));
}

#[test]
fn unchanged_rerun_retrieves_nothing_but_still_pins() {
    let project = ScratchProject::new(
        "[deps.foo]\nimport = \"example.org/foo\"\nbranch = \"dev\"\n",
    );
    let first = RecordingRetriever::new();
    let (deps, graph) = project.model().unwrap();
    Pipeline::new(&project.session, &first, true)
        .resolve(deps, graph)
        .unwrap();

    let second = RecordingRetriever::new();
    let (deps, graph) = project.model().unwrap();
    let report = Pipeline::new(&project.session, &second, false)
        .resolve(deps, graph)
        .unwrap();

    assert!(second.retrieved().is_empty());
    assert_eq!(second.checkouts().len(), 1);
    assert_eq!(report.retrieved_count(), 0);
    assert_eq!(report.resolved_count(), 1);
}

#[test]
fn missing_import_fails_validation_before_any_fetch() {
    let project = ScratchProject::new(
        "[deps.ok]\nimport = \"example.org/ok\"\n\n[deps.broken]\nbranch = \"dev\"\n",
    );
    let retriever = RecordingRetriever::new();
    let (deps, graph) = project.model().unwrap();

    let err = Pipeline::new(&project.session, &retriever, true)
        .resolve(deps, graph)
        .unwrap_err();

    assert!(err.to_string().starts_with("1 dependency validation error(s)"));
    assert!(retriever.retrieved().is_empty());
}

#[test]
fn nested_declaration_is_resolved_before_siblings() {
    let project = ScratchProject::new(
        "[deps.d1]\nimport = \"example.org/d1\"\n\n[deps.d3]\nimport = \"example.org/d3\"\n",
    );
    let retriever = RecordingRetriever::new().with_nested(
        "example.org/d1",
        "repo = \"example.org/d1\"\n\n[deps.d2]\nimport = \"example.org/d2\"\n",
    );
    let (deps, graph) = project.model().unwrap();

    let report = Pipeline::new(&project.session, &retriever, true)
        .resolve(deps, graph)
        .unwrap();

    assert_eq!(
        retriever.retrieved(),
        ["example.org/d1", "example.org/d2", "example.org/d3"]
    );
    let depths: Vec<_> = report.visits().iter().map(|v| v.depth).collect();
    assert_eq!(depths, [0, 1, 0]);
    assert_eq!(report.visits()[1].parent.as_deref(), Some("example.org/d1"));

    let graph = report.graph();
    assert_eq!(graph.search("example.org/d1").unwrap().import, "example.org/d1");
    assert_eq!(graph.search("example.org/d2/pkg").unwrap().import, "example.org/d2");
    assert_eq!(graph.len(), 3);
}

#[test]
fn diamond_is_fetched_once() {
    let project = ScratchProject::new(
        "[deps.b]\nimport = \"example.org/b\"\n\n[deps.c]\nimport = \"example.org/c\"\n",
    );
    let shared = "[deps.d]\nimport = \"example.org/d\"\n";
    let retriever = RecordingRetriever::new()
        .with_nested("example.org/b", shared)
        .with_nested("example.org/c", shared);
    let (deps, graph) = project.model().unwrap();

    let report = Pipeline::new(&project.session, &retriever, true)
        .resolve(deps, graph)
        .unwrap();

    assert_eq!(
        retriever.retrieved(),
        ["example.org/b", "example.org/d", "example.org/c"]
    );
    let repeats: Vec<_> = report
        .visits()
        .iter()
        .filter(|v| v.repeat)
        .map(|v| (v.import.as_str(), v.parent.as_deref()))
        .collect();
    assert_eq!(repeats, [("example.org/d", Some("example.org/c"))]);
    assert!(report.render_tree().contains("example.org/d (*)"));
}

#[test]
fn cycle_terminates() {
    let project = ScratchProject::new("[deps.a]\nimport = \"example.org/a\"\n");
    let retriever = RecordingRetriever::new()
        .with_nested("example.org/a", "[deps.b]\nimport = \"example.org/b\"\n")
        .with_nested("example.org/b", "[deps.a]\nimport = \"example.org/a\"\n");
    let (deps, graph) = project.model().unwrap();

    let report = Pipeline::new(&project.session, &retriever, true)
        .resolve(deps, graph)
        .unwrap();

    assert_eq!(retriever.retrieved(), ["example.org/a", "example.org/b"]);
    assert_eq!(report.visits().len(), 3);
    assert!(report.visits()[2].repeat);
}

#[test]
fn dependency_pointing_back_at_project_is_a_repeat() {
    let project = ScratchProject::new(
        "repo = \"github.com/me/app\"\n\n[deps.a]\nimport = \"example.org/a\"\n",
    );
    let retriever = RecordingRetriever::new().with_nested(
        "example.org/a",
        "[deps.app]\nimport = \"github.com/me/app\"\n",
    );
    let (deps, graph) = project.model().unwrap();

    let report = Pipeline::new(&project.session, &retriever, true)
        .resolve(deps, graph)
        .unwrap();

    assert_eq!(retriever.retrieved(), ["example.org/a"]);
    assert!(report.visits()[1].repeat);
}

#[test]
fn invalid_nested_set_aborts_the_run() {
    let project = ScratchProject::new(
        "[deps.a]\nimport = \"example.org/a\"\n\n[deps.z]\nimport = \"example.org/z\"\n",
    );
    let retriever = RecordingRetriever::new().with_nested(
        "example.org/a",
        "[deps.x]\nscm = \"cvs\"\nimport = \"example.org/x\"\n\n[deps.y]\nbranch = \"b\"\n",
    );
    let (deps, graph) = project.model().unwrap();

    let err = Pipeline::new(&project.session, &retriever, true)
        .resolve(deps, graph)
        .unwrap_err();

    assert!(err.to_string().starts_with("2 dependency validation error(s)"));
    assert_eq!(retriever.retrieved(), ["example.org/a"]);
}

#[test]
fn retrieval_failure_stops_traversal() {
    let project = ScratchProject::new(
        "[deps.a]\nimport = \"example.org/a\"\n\n[deps.b]\nimport = \"example.org/b\"\n\n[deps.c]\nimport = \"example.org/c\"\n",
    );
    let retriever = RecordingRetriever::new().failing_on("example.org/b");
    let (deps, graph) = project.model().unwrap();

    let err = Pipeline::new(&project.session, &retriever, true)
        .resolve(deps, graph)
        .unwrap_err();

    assert!(err.to_string().contains("example.org/b is unreachable"));
    assert_eq!(retriever.retrieved(), ["example.org/a"]);
}

#[test]
fn cancellation_halts_before_next_dependency() {
    let project = ScratchProject::new(
        "[deps.a]\nimport = \"example.org/a\"\n\n[deps.b]\nimport = \"example.org/b\"\n",
    );
    let retriever = RecordingRetriever::new();
    let (deps, graph) = project.model().unwrap();
    let cancel = project.session.cancel.clone();

    let err = Pipeline::new(&project.session, &retriever, true)
        .with_observer(move |_| cancel.cancel())
        .resolve(deps, graph)
        .unwrap_err();

    assert_eq!(err.to_string(), "Operation cancelled");
    assert_eq!(retriever.retrieved(), ["example.org/a"]);
}

#[test]
fn observer_sees_every_visit_in_order() {
    let project = ScratchProject::new(
        "[deps.a]\nimport = \"example.org/a\"\n\n[dev-deps.t]\nimport = \"example.org/t\"\n",
    );
    let retriever = RecordingRetriever::new();
    let (deps, graph) = project.model().unwrap();
    let mut seen = Vec::new();

    Pipeline::new(&project.session, &retriever, true)
        .with_observer(|v| seen.push(v.key.clone()))
        .resolve(deps, graph)
        .unwrap();

    assert_eq!(seen, ["a", "t"]);
}

#[test]
fn graph_records_every_fetched_dependency() {
    let project = ScratchProject::new("[deps.a]\nimport = \"example.org/a\"\n");
    let retriever = RecordingRetriever::new();
    let (deps, _) = project.model().unwrap();

    let report = Pipeline::new(&project.session, &retriever, false)
        .resolve(deps, Graph::new())
        .unwrap();
    assert_eq!(report.graph().len(), 1);
    assert_eq!(report.graph().search("example.org/a/x").unwrap().key, "a");
}

#[test]
fn package_inside_the_project_is_never_fetched() {
    let project = ScratchProject::new(
        "repo = \"example.org/me/app\"\n\n[deps.d1]\nimport = \"example.org/d1\"\n",
    );
    let retriever = RecordingRetriever::new().with_nested(
        "example.org/d1",
        "[deps.inner]\nimport = \"example.org/me/app/internal\"\nbranch = \"hijack\"\n",
    );
    let (deps, graph) = project.model().unwrap();

    let report = Pipeline::new(&project.session, &retriever, true)
        .resolve(deps, graph)
        .unwrap();

    assert_eq!(retriever.retrieved(), ["example.org/d1"]);
    assert!(retriever.checkouts().is_empty());
    let inner = &report.visits()[1];
    assert_eq!(inner.import, "example.org/me/app/internal");
    assert!(inner.repeat);
    assert!(!project
        .session
        .src_path("example.org/me/app/internal")
        .unwrap()
        .exists());
    let own = report.graph().search("example.org/me/app/internal").unwrap();
    assert_eq!(own.import, "example.org/me/app");
    assert_eq!(own.key, "");
}

#[test]
fn package_inside_a_visited_dependency_is_a_repeat() {
    let project = ScratchProject::new(
        "[deps.lib]\nimport = \"example.org/lib\"\n\n[deps.b]\nimport = \"example.org/b\"\n",
    );
    let retriever = RecordingRetriever::new().with_nested(
        "example.org/b",
        "[deps.sub]\nimport = \"example.org/lib/sub\"\ntag = \"v9\"\n",
    );
    let (deps, graph) = project.model().unwrap();

    let report = Pipeline::new(&project.session, &retriever, true)
        .resolve(deps, graph)
        .unwrap();

    assert_eq!(retriever.retrieved(), ["example.org/lib", "example.org/b"]);
    assert!(retriever.checkouts().is_empty());
    assert!(report.visits()[2].repeat);
    assert_eq!(report.visits()[2].parent.as_deref(), Some("example.org/b"));
}

#[test]
fn diamond_graph_keeps_the_checkout_that_was_applied() {
    let project = ScratchProject::new(
        "[deps.b]\nimport = \"example.org/b\"\n\n[deps.c]\nimport = \"example.org/c\"\n",
    );
    let retriever = RecordingRetriever::new()
        .with_nested("example.org/b", "[deps.d]\nimport = \"example.org/d\"\ntag = \"v1\"\n")
        .with_nested("example.org/c", "[deps.d]\nimport = \"example.org/d\"\ntag = \"v2\"\n");
    let (deps, graph) = project.model().unwrap();

    let report = Pipeline::new(&project.session, &retriever, true)
        .resolve(deps, graph)
        .unwrap();

    assert_eq!(
        retriever.checkouts(),
        vec![("example.org/d".to_string(), "tag v1".to_string())]
    );
    let d = report.graph().search("example.org/d").unwrap();
    assert_eq!(d.checkout.as_ref().unwrap().to_string(), "tag v1");
}

#[test]
fn nested_entry_naming_the_project_keeps_its_own_leaf() {
    let project = ScratchProject::new(
        "repo = \"example.org/me/app\"\n\n[deps.a]\nimport = \"example.org/a\"\n",
    );
    let retriever = RecordingRetriever::new().with_nested(
        "example.org/a",
        "[deps.app]\nimport = \"example.org/me/app\"\nbranch = \"old\"\n",
    );
    let (deps, graph) = project.model().unwrap();

    let report = Pipeline::new(&project.session, &retriever, true)
        .resolve(deps, graph)
        .unwrap();

    let own = report.graph().search("example.org/me/app/pkg").unwrap();
    assert_eq!(own.key, "");
    assert!(own.checkout.is_none());
    assert!(retriever.checkouts().is_empty());
}

#[test]
fn traversing_nested_import_aborts_before_fetching_it() {
    let project = ScratchProject::new("[deps.a]\nimport = \"example.org/a\"\n");
    let retriever = RecordingRetriever::new().with_nested(
        "example.org/a",
        "[deps.evil]\nimport = \"example.org/../../../..\"\n",
    );
    let (deps, graph) = project.model().unwrap();

    let err = Pipeline::new(&project.session, &retriever, true)
        .resolve(deps, graph)
        .unwrap_err();

    assert!(err.to_string().starts_with("1 dependency validation error(s)"));
    assert!(err.to_string().contains("malformed"));
    assert_eq!(retriever.retrieved(), ["example.org/a"]);
}
