use std::fmt::Write;

use tracing::{debug, trace};

use crate::{
    bot::{message_builder::Notification, utils::short_sha},
    webhooks::github::{
        events::{
            CommitCommentEvent, IssueCommentEvent, PullRequestEvent, PullRequestReviewCommentEvent,
            PullRequestReviewEvent, PushEvent,
        },
        GitHubEvent,
    },
};

pub fn handle_github_event(event: GitHubEvent) -> Option<Notification> {
    match event {
        GitHubEvent::CommitComment(event) => Some(handle_commit_comment(event)),
        GitHubEvent::IssueComment(event) => Some(handle_issue_comment(event)),
        GitHubEvent::PullRequest(event) => handle_pull_request(event),
        GitHubEvent::PullRequestReview(event) => handle_pull_request_review(event),
        GitHubEvent::PullRequestReviewComment(event) => {
            Some(handle_pull_request_review_comment(event))
        }
        GitHubEvent::Push(event) => Some(handle_push(event)),
        GitHubEvent::Unrecognized(event_type) => {
            debug!("ignoring unrecognized event type `{}`", event_type);
            None
        }
    }
}

fn handle_push(event: PushEvent) -> Notification {
    let (ref_kind, ref_name) = event.ref_kind_and_name();

    let action = if event.created {
        "created"
    } else if event.deleted {
        "deleted"
    } else if event.forced {
        "force pushed to"
    } else {
        "pushed to"
    };

    let mut body = String::new();
    for commit in &event.commits {
        write!(
            body,
            "[{}]({}) {} - {}\n\n",
            short_sha(&commit.id),
            commit.url,
            commit.message,
            commit.committer.name
        )
        .unwrap();
    }

    Notification {
        brief: format!("Push to {}", ref_name),
        title: format!(
            "\\[{}\\] {} {} {} {}",
            event.repository.name, event.pusher.name, action, ref_kind, ref_name
        ),
        url: event.compare,
        body,
    }
}

fn handle_pull_request(event: PullRequestEvent) -> Option<Notification> {
    // new commits on an open PR, already announced by the push
    if event.action == "synchronize" {
        trace!("not announcing synchronized PR #{}", event.number);
        return None;
    }

    let mut title = format!(
        "\\[{}\\] Pull request #{} **{}** by {}",
        event.repository.name, event.number, event.action, event.sender.login
    );

    if event.action == "review_requested" {
        let reviewer = event
            .requested_reviewer
            .map(|user| user.login)
            .or_else(|| event.requested_team.map(|team| team.name));
        if let Some(reviewer) = reviewer {
            write!(title, ": [{}]", reviewer).unwrap();
        }
    }

    let pr = event.pull_request;
    Some(Notification {
        brief: format!("PR #{}", event.number),
        title,
        url: pr.html_url,
        body: format!("{}\n\n{}", pr.title, pr.body.unwrap_or_default()),
    })
}

fn handle_pull_request_review(event: PullRequestReviewEvent) -> Option<Notification> {
    let number = event.pull_request.number;

    let body = match event.review.body {
        Some(body) => body,
        None => {
            trace!("not announcing review without a body on PR #{}", number);
            return None;
        }
    };

    Some(Notification {
        brief: format!("PR #{} review", number),
        title: format!(
            "\\[{}\\] Pull request #{} review {}: **{}** by {}",
            event.repository.name,
            number,
            event.action,
            event.review.state,
            event.sender.login
        ),
        url: event.review.html_url,
        body,
    })
}

fn handle_pull_request_review_comment(event: PullRequestReviewCommentEvent) -> Notification {
    let number = event.pull_request.number;

    Notification {
        brief: format!("PR #{} comment", number),
        title: format!(
            "\\[{}\\] Pull request #{} review comment **{}** by {}",
            event.repository.name, number, event.action, event.sender.login
        ),
        url: event.comment.html_url,
        body: event.comment.body,
    }
}

fn handle_issue_comment(event: IssueCommentEvent) -> Notification {
    let number = event.issue.number;

    Notification {
        brief: format!("Issue #{} comment", number),
        title: format!(
            "\\[{}\\] Issue/pull request #{} comment **{}** by {}",
            event.repository.name, number, event.action, event.sender.login
        ),
        url: event.comment.html_url,
        body: event.comment.body,
    }
}

fn handle_commit_comment(event: CommitCommentEvent) -> Notification {
    let commit = short_sha(&event.comment.commit_id).to_string();

    Notification {
        brief: format!("Commit {} comment", commit),
        title: format!(
            "\\[{}\\] Commit {} comment **{}** by {}",
            event.repository.name, commit, event.action, event.sender.login
        ),
        url: event.comment.html_url,
        body: event.comment.body,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::webhooks::github::GitHubEventType;

    fn notify(event_type: &str, payload: Value) -> Option<Notification> {
        let event_type = GitHubEventType::from(event_type);
        let event = GitHubEvent::from_payload(event_type, &payload.to_string())
            .expect("payload should decode");
        handle_github_event(event)
    }

    fn repository() -> Value {
        json!({ "name": "widget", "full_name": "acme/widget" })
    }

    fn push(r#ref: &str, created: bool, deleted: bool, forced: bool) -> Value {
        json!({
            "ref": r#ref,
            "created": created,
            "deleted": deleted,
            "forced": forced,
            "compare": "https://github.com/acme/widget/compare/1234567...abcdef1",
            "repository": repository(),
            "pusher": { "name": "alice", "email": "alice@example.com" },
            "commits": [
                {
                    "id": "abcdef1234567",
                    "url": "https://x/abcdef1",
                    "message": "fix bug",
                    "committer": { "name": "bob", "email": "bob@example.com" }
                },
                {
                    "id": "0123456789abc",
                    "url": "https://x/0123456",
                    "message": "add tests",
                    "committer": { "name": "carol", "email": "carol@example.com" }
                }
            ]
        })
    }

    fn pull_request(action: &str) -> Value {
        json!({
            "action": action,
            "number": 12,
            "repository": repository(),
            "sender": { "login": "alice" },
            "pull_request": {
                "number": 12,
                "html_url": "https://github.com/acme/widget/pull/12",
                "title": "Add gizmo",
                "body": "Gizmos are great.\r\n\r\nCloses #3"
            }
        })
    }

    fn review(body: Value) -> Value {
        json!({
            "action": "submitted",
            "repository": repository(),
            "sender": { "login": "bob" },
            "pull_request": {
                "number": 12,
                "html_url": "https://github.com/acme/widget/pull/12",
                "title": "Add gizmo",
                "body": null
            },
            "review": {
                "state": "approved",
                "html_url": "https://github.com/acme/widget/pull/12#pullrequestreview-1",
                "body": body
            }
        })
    }

    #[test]
    fn push_to_branch() {
        let notification = notify("push", push("refs/heads/main", false, false, false)).unwrap();

        assert_eq!(notification.brief, "Push to main");
        assert_eq!(
            notification.title,
            "\\[widget\\] alice pushed to branch main"
        );
        assert_eq!(
            notification.url.as_str(),
            "https://github.com/acme/widget/compare/1234567...abcdef1"
        );
        assert_eq!(
            notification.body,
            "[abcdef1](https://x/abcdef1) fix bug - bob\n\n\
             [0123456](https://x/0123456) add tests - carol\n\n"
        );
    }

    #[test]
    fn push_actions_priority() {
        let cases = [
            ((true, false, false), "created"),
            ((true, true, true), "created"),
            ((true, false, true), "created"),
            ((false, true, false), "deleted"),
            ((false, true, true), "deleted"),
            ((false, false, true), "force pushed to"),
            ((false, false, false), "pushed to"),
        ];

        for ((created, deleted, forced), action) in cases {
            let notification =
                notify("push", push("refs/heads/main", created, deleted, forced)).unwrap();
            assert_eq!(
                notification.title,
                format!("\\[widget\\] alice {} branch main", action)
            );
        }
    }

    #[test]
    fn push_tag() {
        let notification = notify("push", push("refs/tags/v1.2.0", true, false, false)).unwrap();

        assert_eq!(notification.brief, "Push to v1.2.0");
        assert_eq!(notification.title, "\\[widget\\] alice created tag v1.2.0");
    }

    #[test]
    fn deleted_branch_has_no_commits() {
        let mut payload = push("refs/heads/feature/old", false, true, false);
        payload["commits"] = json!([]);

        let notification = notify("push", payload).unwrap();

        assert_eq!(
            notification.title,
            "\\[widget\\] alice deleted branch feature/old"
        );
        assert!(notification.body.is_empty());
    }

    #[test]
    fn pull_request_opened() {
        let notification = notify("pull_request", pull_request("opened")).unwrap();

        assert_eq!(notification.brief, "PR #12");
        assert_eq!(
            notification.title,
            "\\[widget\\] Pull request #12 **opened** by alice"
        );
        assert_eq!(
            notification.url.as_str(),
            "https://github.com/acme/widget/pull/12"
        );
        assert_eq!(
            notification.body,
            "Add gizmo\n\nGizmos are great.\r\n\r\nCloses #3"
        );
    }

    #[test]
    fn pull_request_without_description() {
        let mut payload = pull_request("closed");
        payload["pull_request"]["body"] = Value::Null;

        let notification = notify("pull_request", payload).unwrap();

        assert_eq!(notification.body, "Add gizmo\n\n");
    }

    #[test]
    fn pull_request_synchronize_is_suppressed() {
        assert!(notify("pull_request", pull_request("synchronize")).is_none());

        let mut payload = pull_request("synchronize");
        payload["requested_reviewer"] = json!({ "login": "bob" });
        payload["pull_request"]["body"] = Value::Null;
        assert!(notify("pull_request", payload).is_none());
    }

    #[test]
    fn pull_request_review_requested() {
        let mut payload = pull_request("review_requested");
        payload["requested_reviewer"] = json!({ "login": "bob" });

        let notification = notify("pull_request", payload).unwrap();

        assert_eq!(
            notification.title,
            "\\[widget\\] Pull request #12 **review_requested** by alice: [bob]"
        );
    }

    #[test]
    fn review_request_rendering_keeps_reviewer_brackets() {
        let mut payload = pull_request("review_requested");
        payload["requested_reviewer"] = json!({ "login": "bob" });

        let text = notify("pull_request", payload).unwrap().render();

        assert_eq!(
            text,
            "#### [\\[widget\\] Pull request #12 **review_requested** by alice: [bob]]\
             (https://github.com/acme/widget/pull/12)\n\n\
             > Add gizmo\n\n\
             > Gizmos are great.\n\n\
             > Closes #3"
        );
    }

    #[test]
    fn push_to_main_scenario() {
        let mut payload = push("refs/heads/main", false, false, false);
        payload["repository"]["name"] = json!("acme/widget");
        payload["commits"].as_array_mut().unwrap().truncate(1);

        let notification = notify("push", payload).unwrap();

        assert_eq!(
            notification.title,
            "\\[acme/widget\\] alice pushed to branch main"
        );
        assert!(notification
            .body
            .contains("[abcdef1](https://x/abcdef1) fix bug - bob"));
    }

    #[test]
    fn pull_request_review_requested_from_team() {
        let mut payload = pull_request("review_requested");
        payload["requested_team"] = json!({ "name": "maintainers" });

        let notification = notify("pull_request", payload).unwrap();

        assert_eq!(
            notification.title,
            "\\[widget\\] Pull request #12 **review_requested** by alice: [maintainers]"
        );
    }

    #[test]
    fn reviewer_is_only_shown_on_review_requests() {
        let mut payload = pull_request("review_request_removed");
        payload["requested_reviewer"] = json!({ "login": "bob" });

        let notification = notify("pull_request", payload).unwrap();

        assert_eq!(
            notification.title,
            "\\[widget\\] Pull request #12 **review_request_removed** by alice"
        );
    }

    #[test]
    fn pull_request_review() {
        let notification = notify("pull_request_review", review(json!("LGTM"))).unwrap();

        assert_eq!(notification.brief, "PR #12 review");
        assert_eq!(
            notification.title,
            "\\[widget\\] Pull request #12 review submitted: **approved** by bob"
        );
        assert_eq!(
            notification.url.as_str(),
            "https://github.com/acme/widget/pull/12#pullrequestreview-1"
        );
        assert_eq!(notification.body, "LGTM");
    }

    #[test]
    fn pull_request_review_without_body_is_suppressed() {
        assert!(notify("pull_request_review", review(Value::Null)).is_none());
    }

    #[test]
    fn pull_request_review_with_empty_body() {
        let notification = notify("pull_request_review", review(json!(""))).unwrap();

        assert_eq!(notification.body, "");
    }

    #[test]
    fn pull_request_review_comment() {
        let payload = json!({
            "action": "created",
            "repository": repository(),
            "sender": { "login": "carol" },
            "pull_request": {
                "number": 12,
                "html_url": "https://github.com/acme/widget/pull/12",
                "title": "Add gizmo",
                "body": null
            },
            "comment": {
                "html_url": "https://github.com/acme/widget/pull/12#discussion_r42",
                "body": "nit: typo"
            }
        });

        let notification = notify("pull_request_review_comment", payload).unwrap();

        assert_eq!(notification.brief, "PR #12 comment");
        assert_eq!(
            notification.title,
            "\\[widget\\] Pull request #12 review comment **created** by carol"
        );
        assert_eq!(
            notification.url.as_str(),
            "https://github.com/acme/widget/pull/12#discussion_r42"
        );
        assert_eq!(notification.body, "nit: typo");
    }

    #[test]
    fn issue_comment() {
        let payload = json!({
            "action": "edited",
            "repository": repository(),
            "sender": { "login": "dave" },
            "issue": { "number": 3, "title": "Gizmo is missing" },
            "comment": {
                "html_url": "https://github.com/acme/widget/issues/3#issuecomment-7",
                "body": "Working on it"
            }
        });

        let notification = notify("issue_comment", payload).unwrap();

        assert_eq!(notification.brief, "Issue #3 comment");
        assert_eq!(
            notification.title,
            "\\[widget\\] Issue/pull request #3 comment **edited** by dave"
        );
        assert_eq!(notification.body, "Working on it");
    }

    #[test]
    fn commit_comment() {
        let payload = json!({
            "action": "created",
            "repository": repository(),
            "sender": { "login": "erin" },
            "comment": {
                "html_url": "https://github.com/acme/widget/commit/abcdef1234567#commitcomment-9",
                "body": "Why?",
                "commit_id": "abcdef1234567"
            }
        });

        let notification = notify("commit_comment", payload).unwrap();

        assert_eq!(notification.brief, "Commit abcdef1 comment");
        assert_eq!(
            notification.title,
            "\\[widget\\] Commit abcdef1 comment **created** by erin"
        );
        assert_eq!(notification.body, "Why?");
    }

    #[test]
    fn unrecognized_event() {
        let payload = json!({ "zen": "Half measures are as bad as nothing at all." });

        assert!(notify("ping", payload).is_none());
    }
}
