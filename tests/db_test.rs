mod common;

use common::{create_test_db, sample_questions};
use toeflprep::db::RecordOutcome;
use toeflprep::models::{AnswerPayload, Difficulty, GeneratedQuestion, NewQuiz};
use toeflprep::pagination::{ensure_in_range, PageParams, PaginationMeta};

fn quiz_meta(title: Option<&str>, skills: &[&str]) -> NewQuiz {
    NewQuiz {
        title: title.map(String::from),
        interests: "marine biology".to_string(),
        difficulty: Difficulty::Medium,
        skills: skills.iter().map(|s| s.to_string()).collect(),
    }
}

fn answer(question_id: i64, selected: Option<i64>) -> AnswerPayload {
    AnswerPayload {
        question_id,
        selected_option_index: selected,
        time_spent: 5,
    }
}

#[tokio::test]
async fn quiz_round_trips_with_order_and_options_intact() {
    let db = create_test_db().await;
    let user_id = db.create_user("a@example.com", "password123", "A").await.unwrap();

    // Uneven option counts per question
    let questions = vec![
        GeneratedQuestion {
            question_text: "First question".to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer_index: 1,
            explanation: Some("first".to_string()),
        },
        GeneratedQuestion {
            question_text: "Second question".to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into(), "e".into()],
            correct_answer_index: 4,
            explanation: None,
        },
        GeneratedQuestion {
            question_text: "Third question".to_string(),
            options: (0..6).map(|i| format!("choice {i}")).collect(),
            correct_answer_index: 5,
            explanation: Some(String::new()),
        },
    ];

    let public_id = db
        .save_quiz(user_id, quiz_meta(None, &["inference", "detail", "inference"]), &questions)
        .await
        .unwrap();

    let quiz = db.get_quiz(&public_id).await.unwrap().unwrap();
    assert_eq!(quiz.id, public_id);
    assert_eq!(quiz.title, "Custom Exercise: marine biology");
    assert_eq!(quiz.total_questions, 3);
    // Duplicate skill tags collapse
    assert_eq!(quiz.skills, vec!["detail", "inference"]);

    assert_eq!(quiz.questions.len(), 3);
    for (stored, original) in quiz.questions.iter().zip(&questions) {
        assert_eq!(stored.question_text, original.question_text);
        assert_eq!(stored.options, original.options);
        assert_eq!(stored.correct_answer_index, original.correct_answer_index);
        assert_eq!(stored.explanation, original.explanation);
    }
}

#[tokio::test]
async fn explicit_title_is_kept() {
    let db = create_test_db().await;
    let user_id = db.create_user("t@example.com", "password123", "T").await.unwrap();

    let public_id = db
        .save_quiz(user_id, quiz_meta(Some("Reading Drill"), &[]), &sample_questions(1, false))
        .await
        .unwrap();

    let quiz = db.get_quiz(&public_id).await.unwrap().unwrap();
    assert_eq!(quiz.title, "Reading Drill");
}

#[tokio::test]
async fn save_rejects_out_of_range_correct_index() {
    let db = create_test_db().await;
    let user_id = db.create_user("b@example.com", "password123", "B").await.unwrap();

    let mut questions = sample_questions(2, false);
    questions[1].correct_answer_index = 4; // only 4 options, max valid is 3

    let result = db
        .save_quiz(user_id, quiz_meta(None, &["rejected"]), &questions)
        .await;
    assert!(result.is_err());

    // Nothing written
    assert!(db.quizzes_by_skill("rejected").await.unwrap().is_empty());
}

#[tokio::test]
async fn quizzes_by_skill_matches_tag_exactly() {
    let db = create_test_db().await;
    let user_id = db.create_user("c@example.com", "password123", "C").await.unwrap();

    db.save_quiz(user_id, quiz_meta(None, &["grammar", "reading"]), &sample_questions(2, false))
        .await
        .unwrap();
    db.save_quiz(user_id, quiz_meta(None, &["grammar"]), &sample_questions(3, false))
        .await
        .unwrap();
    db.save_quiz(user_id, quiz_meta(None, &["listening"]), &sample_questions(1, false))
        .await
        .unwrap();

    assert_eq!(db.quizzes_by_skill("grammar").await.unwrap().len(), 2);
    assert_eq!(db.quizzes_by_skill("reading").await.unwrap().len(), 1);
    assert!(db.quizzes_by_skill("speaking").await.unwrap().is_empty());
}

#[tokio::test]
async fn attempt_score_is_recomputed_from_stored_answers() {
    let db = create_test_db().await;
    let user_id = db.create_user("d@example.com", "password123", "D").await.unwrap();

    // Correct indices: q1 -> 0, q2 -> 1, q3 -> 2
    let public_id = db
        .save_quiz(user_id, quiz_meta(None, &[]), &sample_questions(3, true))
        .await
        .unwrap();
    let quiz = db.get_quiz(&public_id).await.unwrap().unwrap();
    let ids: Vec<i64> = quiz.questions.iter().map(|q| q.id).collect();

    // Two right, one wrong
    let answers = vec![answer(ids[0], Some(0)), answer(ids[1], Some(3)), answer(ids[2], Some(2))];
    let outcome = db.record_attempt(user_id, &public_id, &answers, 120).await.unwrap();
    let attempt_id = match outcome {
        RecordOutcome::Saved(id) => id,
        _ => panic!("attempt was not saved"),
    };

    let review = db.build_review(&attempt_id).await.unwrap().unwrap();
    assert_eq!(review.attempt.score, 2);
    assert_eq!(review.attempt.total_questions, 3);
    assert_eq!(review.attempt.percentage, 67.0);
    assert_eq!(review.attempt.time_spent, 120);

    assert_eq!(review.questions.len(), 3);
    let first = &review.questions[0];
    assert_eq!(first.number, 1);
    assert_eq!(first.user_answer, first.correct_answer);
    assert_eq!(first.answers[0].label, "A");
    assert_eq!(first.answers[3].label, "D");
    assert_eq!(first.explanation, "Because of rule 1");

    let second = &review.questions[1];
    assert_eq!(second.correct_answer, "Q2 option 1");
    assert_eq!(second.user_answer, "Q2 option 3");
    assert_ne!(second.user_answer, second.correct_answer);
}

#[tokio::test]
async fn empty_attempt_scores_zero_and_reviews_as_unanswered() {
    let db = create_test_db().await;
    let user_id = db.create_user("e@example.com", "password123", "E").await.unwrap();

    let public_id = db
        .save_quiz(user_id, quiz_meta(None, &[]), &sample_questions(3, false))
        .await
        .unwrap();

    let outcome = db.record_attempt(user_id, &public_id, &[], 0).await.unwrap();
    let attempt_id = match outcome {
        RecordOutcome::Saved(id) => id,
        _ => panic!("attempt was not saved"),
    };

    let review = db.build_review(&attempt_id).await.unwrap().unwrap();
    assert_eq!(review.attempt.score, 0);
    assert_eq!(review.attempt.percentage, 0.0);
    assert_eq!(review.attempt.total_questions, 3);
    assert_eq!(review.questions.len(), 3);
    for question in &review.questions {
        assert_eq!(question.user_answer, "Not answered");
        assert_ne!(question.correct_answer, "Not answered");
        assert_eq!(question.explanation, "No explanation provided.");
    }
}

#[tokio::test]
async fn skipped_answer_counts_as_incorrect() {
    let db = create_test_db().await;
    let user_id = db.create_user("f@example.com", "password123", "F").await.unwrap();

    let public_id = db
        .save_quiz(user_id, quiz_meta(None, &[]), &sample_questions(2, false))
        .await
        .unwrap();
    let quiz = db.get_quiz(&public_id).await.unwrap().unwrap();

    let answers = vec![
        answer(quiz.questions[0].id, None),
        answer(quiz.questions[1].id, Some(1)),
    ];
    let outcome = db.record_attempt(user_id, &public_id, &answers, 30).await.unwrap();
    let attempt_id = match outcome {
        RecordOutcome::Saved(id) => id,
        _ => panic!("attempt was not saved"),
    };

    let review = db.build_review(&attempt_id).await.unwrap().unwrap();
    assert_eq!(review.attempt.score, 1);
    assert_eq!(review.questions[0].user_answer, "Not answered");
    assert_eq!(review.questions[1].user_answer, "Q2 option 1");
}

#[tokio::test]
async fn attempt_against_missing_quiz_is_not_found() {
    let db = create_test_db().await;
    let user_id = db.create_user("g@example.com", "password123", "G").await.unwrap();

    let outcome = db
        .record_attempt(user_id, "01ARZ3NDEKTSV4RRFFQ69G5FAV", &[], 0)
        .await
        .unwrap();
    assert!(matches!(outcome, RecordOutcome::QuizNotFound));
}

#[tokio::test]
async fn repeated_answers_for_one_question_cannot_inflate_the_score() {
    let db = create_test_db().await;
    let user_id = db.create_user("dup@example.com", "password123", "Dup").await.unwrap();

    let public_id = db
        .save_quiz(user_id, quiz_meta(None, &[]), &sample_questions(2, false))
        .await
        .unwrap();
    let quiz = db.get_quiz(&public_id).await.unwrap().unwrap();

    // Four correct answers for the first question on a two-question quiz
    let answers: Vec<_> = (0..4).map(|_| answer(quiz.questions[0].id, Some(0))).collect();
    let outcome = db.record_attempt(user_id, &public_id, &answers, 20).await.unwrap();
    assert!(matches!(outcome, RecordOutcome::DuplicateAnswer));
    assert_eq!(db.attempts_count(user_id).await.unwrap(), 0);
}

#[tokio::test]
async fn save_rejects_option_counts_outside_the_allowed_range() {
    let db = create_test_db().await;
    let user_id = db.create_user("opts@example.com", "password123", "O").await.unwrap();

    let mut too_few = sample_questions(1, false);
    too_few[0].options.truncate(3);
    too_few[0].correct_answer_index = 0;
    assert!(db.save_quiz(user_id, quiz_meta(None, &[]), &too_few).await.is_err());

    let mut too_many = sample_questions(1, false);
    too_many[0].options = (0..11).map(|i| format!("choice {i}")).collect();
    assert!(db.save_quiz(user_id, quiz_meta(None, &[]), &too_many).await.is_err());

    let ten = vec![GeneratedQuestion {
        question_text: "Wide question".to_string(),
        options: (0..10).map(|i| format!("choice {i}")).collect(),
        correct_answer_index: 9,
        explanation: None,
    }];
    assert!(db.save_quiz(user_id, quiz_meta(None, &[]), &ten).await.is_ok());
}

#[tokio::test]
async fn answer_for_foreign_question_is_rejected_without_writes() {
    let db = create_test_db().await;
    let user_id = db.create_user("h@example.com", "password123", "H").await.unwrap();

    let public_id = db
        .save_quiz(user_id, quiz_meta(None, &[]), &sample_questions(2, false))
        .await
        .unwrap();

    let outcome = db
        .record_attempt(user_id, &public_id, &[answer(999_999, Some(0))], 10)
        .await
        .unwrap();
    assert!(matches!(outcome, RecordOutcome::UnknownQuestion));
    assert_eq!(db.attempts_count(user_id).await.unwrap(), 0);
}

#[tokio::test]
async fn review_is_stable_across_reads() {
    let db = create_test_db().await;
    let user_id = db.create_user("i@example.com", "password123", "I").await.unwrap();

    let public_id = db
        .save_quiz(user_id, quiz_meta(None, &["detail"]), &sample_questions(3, true))
        .await
        .unwrap();
    let quiz = db.get_quiz(&public_id).await.unwrap().unwrap();
    let answers: Vec<_> = quiz.questions.iter().map(|q| answer(q.id, Some(0))).collect();

    let outcome = db.record_attempt(user_id, &public_id, &answers, 45).await.unwrap();
    let attempt_id = match outcome {
        RecordOutcome::Saved(id) => id,
        _ => panic!("attempt was not saved"),
    };

    let first = db.build_review(&attempt_id).await.unwrap().unwrap();
    let second = db.build_review(&attempt_id).await.unwrap().unwrap();
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[tokio::test]
async fn review_of_unknown_attempt_is_none() {
    let db = create_test_db().await;
    assert!(db.build_review("does-not-exist").await.unwrap().is_none());
}

#[tokio::test]
async fn history_pages_cover_all_attempts_without_overlap() {
    let db = create_test_db().await;
    let user_id = db.create_user("j@example.com", "password123", "J").await.unwrap();

    let public_id = db
        .save_quiz(user_id, quiz_meta(None, &[]), &sample_questions(2, false))
        .await
        .unwrap();
    for _ in 0..7 {
        let outcome = db.record_attempt(user_id, &public_id, &[], 1).await.unwrap();
        assert!(matches!(outcome, RecordOutcome::Saved(_)));
    }

    let total = db.attempts_count(user_id).await.unwrap();
    assert_eq!(total, 7);

    let mut seen = Vec::new();
    for page in 1..=3 {
        let params = PageParams::new(Some(page), Some(3), 10).unwrap();
        ensure_in_range(total, params).unwrap();
        let rows = db.attempt_history(user_id, params).await.unwrap();
        let expected = if page < 3 { 3 } else { 1 };
        assert_eq!(rows.len(), expected);
        seen.extend(rows.into_iter().map(|r| r.id));
    }

    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 7);

    let params = PageParams::new(Some(4), Some(3), 10).unwrap();
    assert!(ensure_in_range(total, params).is_err());

    let meta = PaginationMeta::build(total, PageParams::new(Some(2), Some(3), 10).unwrap());
    assert_eq!(meta.total_pages, 3);
    assert!(meta.has_next);
    assert!(meta.has_prev);
}

#[tokio::test]
async fn history_rows_carry_quiz_title() {
    let db = create_test_db().await;
    let user_id = db.create_user("k@example.com", "password123", "K").await.unwrap();

    let public_id = db
        .save_quiz(user_id, quiz_meta(Some("Listening Set"), &[]), &sample_questions(2, false))
        .await
        .unwrap();
    db.record_attempt(user_id, &public_id, &[], 5).await.unwrap();

    let params = PageParams::new(None, None, 10).unwrap();
    let rows = db.attempt_history(user_id, params).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Listening Set");
    assert_eq!(rows[0].total_questions, 2);
}

#[tokio::test]
async fn history_is_scoped_to_the_user() {
    let db = create_test_db().await;
    let first = db.create_user("l@example.com", "password123", "L").await.unwrap();
    let second = db.create_user("m@example.com", "password123", "M").await.unwrap();

    let public_id = db
        .save_quiz(first, quiz_meta(None, &[]), &sample_questions(2, false))
        .await
        .unwrap();
    db.record_attempt(first, &public_id, &[], 5).await.unwrap();

    assert_eq!(db.attempts_count(first).await.unwrap(), 1);
    assert_eq!(db.attempts_count(second).await.unwrap(), 0);
}

#[tokio::test]
async fn session_lifecycle_and_password_change() {
    let db = create_test_db().await;
    let user_id = db.create_user("n@example.com", "password123", "N").await.unwrap();

    assert!(db.verify_user_password("n@example.com", "password123").await.unwrap());
    assert!(!db.verify_user_password("n@example.com", "wrong").await.unwrap());

    let session = db.create_user_session(user_id).await.unwrap();
    let user = db.get_user_by_session(&session).await.unwrap().unwrap();
    assert_eq!(user.email, "n@example.com");

    db.delete_user_session(&session).await.unwrap();
    assert!(db.get_user_by_session(&session).await.unwrap().is_none());

    assert!(!db.change_password(user_id, "wrong", "newpassword1").await.unwrap());
    assert!(db.change_password(user_id, "password123", "newpassword1").await.unwrap());
    assert!(db.verify_user_password("n@example.com", "newpassword1").await.unwrap());
}

#[tokio::test]
async fn profile_update_keeps_unset_fields() {
    let db = create_test_db().await;
    let user_id = db.create_user("o@example.com", "password123", "Old Name").await.unwrap();

    let updated = db.update_profile(user_id, Some("New Name"), None).await.unwrap();
    assert_eq!(updated.display_name, "New Name");
    assert_eq!(updated.email, "o@example.com");
}
