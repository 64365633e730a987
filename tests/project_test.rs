//! Project and section model tests — ownership scoping, ordering,
//! cascade deletion, refinement history, and dashboard stats.

mod common;

use draftdeck::models::{feedback, project, refinement, section};
use common::*;

#[test]
fn test_find_owned_scopes_to_owner() {
    let (_dir, conn) = setup_test_db();

    let owner = seed_user(&conn);
    let other = draftdeck::models::user::create(&conn, "other@example.com", TEST_HASH)
        .expect("Failed to create second user");
    let project_id = seed_project(&conn, owner, "docx");

    assert!(project::find_owned(&conn, project_id, owner).expect("Query failed").is_some());
    // Another user's lookup behaves as if the project does not exist.
    assert!(project::find_owned(&conn, project_id, other).expect("Query failed").is_none());
}

#[test]
fn test_sections_come_back_in_ord_order() {
    let (_dir, conn) = setup_test_db();

    let user_id = seed_user(&conn);
    let project_id = seed_project(&conn, user_id, "pptx");
    // Non-contiguous, inserted out of order.
    seed_section(&conn, project_id, "Third", 30);
    seed_section(&conn, project_id, "First", 5);
    seed_section(&conn, project_id, "Second", 12);

    let sections = section::find_ordered(&conn, project_id).expect("Query failed");
    let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);
}

#[test]
fn test_list_includes_section_count() {
    let (_dir, conn) = setup_test_db();

    let user_id = seed_user(&conn);
    let project_id = seed_project(&conn, user_id, "docx");
    seed_section(&conn, project_id, "Intro", 1);
    seed_section(&conn, project_id, "Body", 2);

    let items = project::find_all_for_user(&conn, user_id).expect("Query failed");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].section_count, 2);
}

#[test]
fn test_delete_cascades_to_children() {
    let (_dir, conn) = setup_test_db();

    let user_id = seed_user(&conn);
    let project_id = seed_project(&conn, user_id, "docx");
    let section_id = seed_section(&conn, project_id, "Intro", 1);
    refinement::create(&conn, section_id, "shorter", "old text", "new text")
        .expect("Failed to create refinement");
    feedback::create(&conn, section_id, "like", "good").expect("Failed to create feedback");

    project::delete(&conn, project_id).expect("Delete failed");

    assert!(section::find_by_id(&conn, section_id).expect("Query failed").is_none());
    assert!(refinement::find_for_section(&conn, section_id).expect("Query failed").is_empty());
    assert!(feedback::find_for_section(&conn, section_id).expect("Query failed").is_empty());
}

#[test]
fn test_refinement_history_preserves_both_versions() {
    let (_dir, conn) = setup_test_db();

    let user_id = seed_user(&conn);
    let project_id = seed_project(&conn, user_id, "pptx");
    let section_id = seed_section(&conn, project_id, "Intro", 1);

    section::update_content(&conn, section_id, "original").expect("Update failed");
    refinement::create(&conn, section_id, "make it punchy", "original", "punchy version")
        .expect("Failed to create refinement");
    section::update_content(&conn, section_id, "punchy version").expect("Update failed");

    let history = refinement::find_for_section(&conn, section_id).expect("Query failed");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].previous_content, "original");
    assert_eq!(history[0].new_content, "punchy version");

    let current = section::find_by_id(&conn, section_id)
        .expect("Query failed")
        .expect("Section not found");
    assert_eq!(current.content, "punchy version");
}

#[test]
fn test_feedback_type_constraint() {
    let (_dir, conn) = setup_test_db();

    let user_id = seed_user(&conn);
    let project_id = seed_project(&conn, user_id, "docx");
    let section_id = seed_section(&conn, project_id, "Intro", 1);

    assert!(feedback::create(&conn, section_id, "like", "").is_ok());
    assert!(feedback::create(&conn, section_id, "dislike", "meh").is_ok());
    assert!(feedback::create(&conn, section_id, "love", "").is_err());
}

#[test]
fn test_stats_counts_generated_sections_only() {
    let (_dir, conn) = setup_test_db();

    let user_id = seed_user(&conn);
    let docx_id = seed_project(&conn, user_id, "docx");
    let pptx_id = seed_project(&conn, user_id, "pptx");
    let generated = seed_section(&conn, docx_id, "Intro", 1);
    seed_section(&conn, docx_id, "Empty", 2);
    let s3 = seed_section(&conn, pptx_id, "Slide", 1);

    section::update_content(&conn, generated, "some text").expect("Update failed");
    refinement::create(&conn, generated, "p", "a", "b").expect("Failed to create refinement");
    feedback::create(&conn, s3, "like", "").expect("Failed to create feedback");

    let stats = project::stats_for_user(&conn, user_id).expect("Query failed");
    assert_eq!(stats.total_projects, 2);
    assert_eq!(stats.docx_count, 1);
    assert_eq!(stats.pptx_count, 1);
    assert_eq!(stats.generated_sections, 1);
    assert_eq!(stats.total_refinements, 1);
    assert_eq!(stats.total_feedback, 1);
}

#[test]
fn test_document_type_constraint() {
    let (_dir, conn) = setup_test_db();
    let user_id = seed_user(&conn);

    let result = project::create(
        &conn,
        &draftdeck::models::project::NewProject {
            user_id,
            title: "Bad".to_string(),
            document_type: "pdf".to_string(),
            main_topic: "t".to_string(),
            metadata_json: None,
        },
    );
    assert!(result.is_err());
}
