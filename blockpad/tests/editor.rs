use blockpad::catalog::pattern::Pattern;
use blockpad::codegen;
use blockpad::{BlockId, BlockInstance, BlockTemplate, Catalog, Workspace};

fn kind<'a>(catalog: &'a Catalog, name: &str) -> &'a BlockTemplate {
    catalog
        .template(name)
        .expect("builtin palette is missing a kind")
}

fn lines(ws: &Workspace) -> Vec<String> {
    codegen::generate(ws).lines().map(str::to_string).collect()
}

/// How many blocks anywhere in the forest carry `id`.
fn occurrences(ws: &Workspace, id: BlockId) -> usize {
    fn count(seq: &[BlockInstance], id: BlockId) -> usize {
        seq.iter()
            .map(|block| {
                let own = usize::from(block.id == id);
                own + block
                    .child_slots()
                    .into_iter()
                    .map(|slot| count(slot, id))
                    .sum::<usize>()
            })
            .sum()
    }
    count(ws.roots(), id)
}

#[test]
fn set_variable_renders_single_line() {
    let catalog = Catalog::builtin();
    let mut ws = Workspace::new();
    let block = ws.instantiate_with(kind(&catalog, "var_set"), [("name", "secret"), ("value", "7")]);
    ws.insert_at_root(block);

    assert_eq!(codegen::generate(&ws), "secret = 7");
}

#[test]
fn empty_loop_gets_pass_placeholder() {
    let catalog = Catalog::builtin();
    let mut ws = Workspace::new();
    let block = ws.instantiate_with(kind(&catalog, "repeat_times"), [("times", "3")]);
    ws.insert_at_root(block);

    assert_eq!(lines(&ws), vec!["for _ in range(3):", "    pass"]);
}

#[test]
fn if_else_always_emits_else() {
    let catalog = Catalog::builtin();
    let mut ws = Workspace::new();
    let branch =
        ws.instantiate_with(kind(&catalog, "if_else_block"), [("condition", "guess == 7")]);
    let branch_id = branch.id;
    ws.insert_at_root(branch);

    ws.set_selection(branch_id, false);
    let win = ws.instantiate_with(kind(&catalog, "print_msg"), [("message", "\"You got it!\"")]);
    ws.insert_at_cursor(win);

    assert_eq!(
        lines(&ws),
        vec![
            "if guess == 7:",
            "    print(\"You got it!\")",
            "else:",
            "    pass",
        ]
    );
}

#[test]
fn nested_removal_empties_forest() {
    let catalog = Catalog::builtin();
    let mut ws = Workspace::new();
    let a = ws.instantiate(kind(&catalog, "if_block"));
    let a_id = a.id;
    ws.insert_at_root(a);

    ws.set_selection(a_id, false);
    let b = ws.instantiate(kind(&catalog, "var_print"));
    let b_id = b.id;
    ws.insert_at_cursor(b);
    assert_eq!(ws.len(), 2);

    assert!(ws.remove(b_id).is_some());
    assert!(ws.remove(a_id).is_some());
    assert!(ws.is_empty());
    assert!(ws.remove(b_id).is_none(), "removing twice must miss");
}

#[test]
fn removal_detaches_whole_subtree() {
    let catalog = Catalog::builtin();
    let mut ws = Workspace::new();
    let outer = ws.instantiate(kind(&catalog, "while_block"));
    let outer_id = outer.id;
    ws.insert_at_root(outer);

    ws.set_selection(outer_id, false);
    let inner = ws.instantiate(kind(&catalog, "var_print"));
    let inner_id = inner.id;
    ws.insert_at_cursor(inner);

    let removed = ws.remove(outer_id).expect("outer exists");
    assert_eq!(removed.body.len(), 1);
    assert_eq!(removed.body[0].id, inner_id);
    assert!(ws.is_empty());
    assert!(ws.find(inner_id).is_none(), "descendants leave with the subtree");
}

#[test]
fn moved_parent_carries_children() {
    let catalog = Catalog::builtin();
    let mut ws = Workspace::new();
    let x = ws.instantiate(kind(&catalog, "var_print"));
    let y = ws.instantiate(kind(&catalog, "if_block"));
    let z = ws.instantiate(kind(&catalog, "while_block"));
    let (x_id, y_id, z_id) = (x.id, y.id, z.id);
    ws.insert_at_root(x);
    ws.insert_at_root(y);
    ws.insert_at_root(z);

    assert!(ws.move_into(x_id, y_id, false));
    assert!(ws.move_into(y_id, z_id, false));

    let z_block = ws.find(z_id).expect("z stays at root");
    assert_eq!(z_block.body[0].id, y_id);
    assert_eq!(z_block.body[0].body[0].id, x_id, "x travels with y");
    assert_eq!(occurrences(&ws, x_id), 1);
}

#[test]
fn ids_are_unique_and_increasing() {
    let catalog = Catalog::builtin();
    let mut ws = Workspace::new();
    let mut ids = Vec::new();
    for template in catalog.templates() {
        let block = ws.instantiate(template);
        ids.push(block.id);
        ws.insert_at_root(block);
    }
    for pair in ids.windows(2) {
        assert!(pair[0] < pair[1], "ids must grow monotonically");
    }
}

#[test]
fn move_preserves_block_count() {
    let catalog = Catalog::builtin();
    let mut ws = Workspace::new();
    let a = ws.instantiate(kind(&catalog, "if_block"));
    let b = ws.instantiate(kind(&catalog, "while_block"));
    let leaf = ws.instantiate(kind(&catalog, "var_print"));
    let (a_id, b_id, leaf_id) = (a.id, b.id, leaf.id);
    ws.insert_at_root(a);
    ws.insert_at_root(b);
    ws.insert_at_root(leaf);

    let before = ws.len();
    assert!(ws.move_into(leaf_id, a_id, false));
    assert_eq!(ws.len(), before);
    assert_eq!(occurrences(&ws, leaf_id), 1);

    assert!(ws.move_into(leaf_id, b_id, false));
    assert_eq!(ws.len(), before);
    assert_eq!(occurrences(&ws, leaf_id), 1);
}

#[test]
fn generation_is_idempotent() {
    let catalog = Catalog::builtin();
    let mut ws = Workspace::new();
    let branch = ws.instantiate(kind(&catalog, "if_else_block"));
    let branch_id = branch.id;
    ws.insert_at_root(branch);
    ws.set_selection(branch_id, true);
    let other = ws.instantiate(kind(&catalog, "print_msg"));
    ws.insert_at_cursor(other);

    assert_eq!(codegen::generate(&ws), codegen::generate(&ws));
}

#[test]
fn empty_workspace_generates_empty_string() {
    let ws = Workspace::new();
    assert_eq!(codegen::generate(&ws), "");
}

#[test]
fn cursor_targets_selected_container() {
    let catalog = Catalog::builtin();
    let mut ws = Workspace::new();
    let branch = ws.instantiate(kind(&catalog, "if_else_block"));
    let branch_id = branch.id;
    ws.insert_at_root(branch);

    ws.set_selection(branch_id, true);
    let consolation = ws.instantiate_with(kind(&catalog, "print_msg"), [("message", "\"Nope\"")]);
    let consolation_id = consolation.id;
    ws.insert_at_cursor(consolation);

    let branch = ws.find(branch_id).expect("branch at root");
    assert!(branch.body.is_empty());
    assert_eq!(branch.alternate_body[0].id, consolation_id);
}

#[test]
fn reselection_replaces_cursor() {
    let catalog = Catalog::builtin();
    let mut ws = Workspace::new();
    let first = ws.instantiate(kind(&catalog, "if_block"));
    let second = ws.instantiate(kind(&catalog, "while_block"));
    let (first_id, second_id) = (first.id, second.id);
    ws.insert_at_root(first);
    ws.insert_at_root(second);

    ws.set_selection(first_id, false);
    ws.set_selection(second_id, false);
    let leaf = ws.instantiate(kind(&catalog, "var_print"));
    let leaf_id = leaf.id;
    ws.insert_at_cursor(leaf);

    assert!(ws.find(first_id).expect("first").body.is_empty());
    assert_eq!(ws.find(second_id).expect("second").body[0].id, leaf_id);
}

#[test]
fn stale_cursor_falls_back_to_root() {
    let catalog = Catalog::builtin();
    let mut ws = Workspace::new();
    let branch = ws.instantiate(kind(&catalog, "if_block"));
    let branch_id = branch.id;
    ws.insert_at_root(branch);

    ws.set_selection(branch_id, false);
    ws.remove(branch_id);

    let orphan = ws.instantiate(kind(&catalog, "var_print"));
    let orphan_id = orphan.id;
    ws.insert_at_cursor(orphan);

    assert_eq!(ws.roots().len(), 1);
    assert_eq!(ws.roots()[0].id, orphan_id);
}

#[test]
fn cursor_on_incapable_slot_falls_back_to_root() {
    let catalog = Catalog::builtin();
    let mut ws = Workspace::new();
    // if_block has a body but no else-sequence
    let branch = ws.instantiate(kind(&catalog, "if_block"));
    let branch_id = branch.id;
    ws.insert_at_root(branch);

    ws.set_selection(branch_id, true);
    let leaf = ws.instantiate(kind(&catalog, "var_print"));
    let leaf_id = leaf.id;
    ws.insert_at_cursor(leaf);

    let branch = ws.find(branch_id).expect("branch at root");
    assert!(branch.alternate_body.is_empty());
    assert_eq!(ws.roots()[1].id, leaf_id);
}

#[test]
fn clearing_selection_restores_root_insertion() {
    let catalog = Catalog::builtin();
    let mut ws = Workspace::new();
    let branch = ws.instantiate(kind(&catalog, "if_block"));
    let branch_id = branch.id;
    ws.insert_at_root(branch);

    ws.set_selection(branch_id, false);
    assert!(ws.selection().is_some());
    ws.clear_selection();
    assert!(ws.selection().is_none());

    let leaf = ws.instantiate(kind(&catalog, "var_print"));
    let leaf_id = leaf.id;
    ws.insert_at_cursor(leaf);
    assert_eq!(ws.roots()[1].id, leaf_id);
}

#[test]
fn move_to_root_clamps_index() {
    let catalog = Catalog::builtin();
    let mut ws = Workspace::new();
    let a = ws.instantiate(kind(&catalog, "var_print"));
    let b = ws.instantiate(kind(&catalog, "print_msg"));
    let (a_id, b_id) = (a.id, b.id);
    ws.insert_at_root(a);
    ws.insert_at_root(b);

    assert!(ws.move_to_root(a_id, 99));
    assert_eq!(ws.roots()[0].id, b_id);
    assert_eq!(ws.roots()[1].id, a_id);

    assert!(ws.move_to_root(a_id, 0));
    assert_eq!(ws.roots()[0].id, a_id);
}

#[test]
fn move_of_missing_id_is_noop() {
    let catalog = Catalog::builtin();
    let mut ws = Workspace::new();
    let a = ws.instantiate(kind(&catalog, "var_print"));
    let a_id = a.id;
    ws.insert_at_root(a);
    let gone = ws.instantiate(kind(&catalog, "var_print"));
    let gone_id = gone.id;
    drop(gone);

    assert!(!ws.move_to_root(gone_id, 0));
    assert!(!ws.move_into(gone_id, a_id, false));
    assert_eq!(ws.len(), 1);
}

#[test]
fn move_into_missing_container_is_noop() {
    let catalog = Catalog::builtin();
    let mut ws = Workspace::new();
    let a = ws.instantiate(kind(&catalog, "var_print"));
    let a_id = a.id;
    ws.insert_at_root(a);
    let gone = ws.instantiate(kind(&catalog, "if_block"));
    let gone_id = gone.id;
    drop(gone);

    assert!(!ws.move_into(a_id, gone_id, false));
    assert_eq!(ws.roots()[0].id, a_id, "a stays where it was");
}

#[test]
fn move_into_own_subtree_is_rejected() {
    let catalog = Catalog::builtin();
    let mut ws = Workspace::new();
    let outer = ws.instantiate(kind(&catalog, "while_block"));
    let outer_id = outer.id;
    ws.insert_at_root(outer);

    ws.set_selection(outer_id, false);
    let inner = ws.instantiate(kind(&catalog, "if_block"));
    let inner_id = inner.id;
    ws.insert_at_cursor(inner);

    assert!(!ws.move_into(outer_id, outer_id, false));
    assert!(!ws.move_into(outer_id, inner_id, false));
    assert_eq!(ws.roots()[0].id, outer_id, "outer is still reachable");
    assert_eq!(ws.len(), 2);
    assert_eq!(occurrences(&ws, outer_id), 1);
}

#[test]
fn move_into_incapable_container_is_noop() {
    let catalog = Catalog::builtin();
    let mut ws = Workspace::new();
    let leaf = ws.instantiate(kind(&catalog, "var_print"));
    let target = ws.instantiate(kind(&catalog, "if_block"));
    let (leaf_id, target_id) = (leaf.id, target.id);
    ws.insert_at_root(leaf);
    ws.insert_at_root(target);

    // a leaf has no body; an if-without-else has no else-sequence
    assert!(!ws.move_into(target_id, leaf_id, false));
    assert!(!ws.move_into(leaf_id, target_id, true));
    assert_eq!(ws.roots().len(), 2);
}

#[test]
fn defaults_seed_new_instances() {
    let catalog = Catalog::builtin();
    let mut ws = Workspace::new();
    let block = ws.instantiate(kind(&catalog, "var_create"));
    ws.insert_at_root(block);

    assert_eq!(codegen::generate(&ws), "x = 10");
}

#[test]
fn slot_edits_reach_generated_text() {
    let catalog = Catalog::builtin();
    let mut ws = Workspace::new();
    let block = ws.instantiate(kind(&catalog, "while_block"));
    let block_id = block.id;
    ws.insert_at_root(block);

    assert!(ws.set_slot_value(block_id, "condition", "lives > 0"));
    assert_eq!(lines(&ws)[0], "while lives > 0:");

    let gone = ws.instantiate(kind(&catalog, "var_print"));
    let gone_id = gone.id;
    drop(gone);
    assert!(!ws.set_slot_value(gone_id, "name", "x"));
}

#[test]
fn instances_do_not_track_template_edits() {
    let catalog = Catalog::builtin();
    let mut template = kind(&catalog, "var_set").clone();
    let mut ws = Workspace::new();
    let block = ws.instantiate_with(&template, [("name", "score"), ("value", "1")]);
    ws.insert_at_root(block);

    template.pattern = Pattern::parse("changed {name}");
    assert_eq!(codegen::generate(&ws), "score = 1");
}

#[test]
fn clear_resets_workspace() {
    let catalog = Catalog::builtin();
    let mut ws = Workspace::new();
    let branch = ws.instantiate(kind(&catalog, "if_else_block"));
    let branch_id = branch.id;
    ws.insert_at_root(branch);
    ws.set_selection(branch_id, false);
    let leaf = ws.instantiate(kind(&catalog, "var_print"));
    ws.insert_at_cursor(leaf);

    ws.clear();
    assert!(ws.is_empty());
    assert_eq!(ws.len(), 0);
    assert_eq!(codegen::generate(&ws), "");

    // the dangling cursor degrades to root insertion
    let fresh = ws.instantiate(kind(&catalog, "var_print"));
    let fresh_id = fresh.id;
    ws.insert_at_cursor(fresh);
    assert_eq!(ws.roots()[0].id, fresh_id);
}

#[test]
fn deep_nesting_indents_per_level() {
    let catalog = Catalog::builtin();
    let mut ws = Workspace::new();
    let outer = ws.instantiate_with(kind(&catalog, "repeat_times"), [("times", "2")]);
    let outer_id = outer.id;
    ws.insert_at_root(outer);

    ws.set_selection(outer_id, false);
    let inner = ws.instantiate_with(kind(&catalog, "if_block"), [("condition", "x > 0")]);
    let inner_id = inner.id;
    ws.insert_at_cursor(inner);

    ws.set_selection(inner_id, false);
    let leaf = ws.instantiate_with(kind(&catalog, "print_msg"), [("message", "\"deep\"")]);
    ws.insert_at_cursor(leaf);

    assert_eq!(
        lines(&ws),
        vec![
            "for _ in range(2):",
            "    if x > 0:",
            "        print(\"deep\")",
        ]
    );
}
