//! Context carryover between personas.
//!
//! When control moves to a new persona it inherits a short tail of the
//! previous persona's conversation. The tail is bounded, skips system
//! messages, and never starts with a function call or function output
//! whose counterpart was cut off.

use carecall_types::{ChatContext, ChatItem};

/// Maximum number of items carried across a handoff.
pub const CARRYOVER_LIMIT: usize = 6;

/// Which items qualify for truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncateOptions {
    pub keep_last_n: usize,
    pub keep_system_message: bool,
    pub keep_function_call: bool,
}

impl Default for TruncateOptions {
    fn default() -> Self {
        Self {
            keep_last_n: CARRYOVER_LIMIT,
            keep_system_message: false,
            keep_function_call: false,
        }
    }
}

impl TruncateOptions {
    /// Options used on persona handoff: function calls are kept so the new
    /// persona can see which capability led to it.
    pub fn handoff() -> Self {
        Self {
            keep_function_call: true,
            ..Self::default()
        }
    }

    fn qualifies(&self, item: &ChatItem) -> bool {
        if !self.keep_system_message && item.is_system_message() {
            return false;
        }
        if !self.keep_function_call && item.is_function_call() {
            return false;
        }
        true
    }
}

/// Returns the last `keep_last_n` qualifying items of `items`, in original
/// order, with any leading function-call items removed.
pub fn truncate_items(items: &[ChatItem], options: TruncateOptions) -> Vec<ChatItem> {
    let mut tail: Vec<ChatItem> = items
        .iter()
        .rev()
        .filter(|item| options.qualifies(item))
        .take(options.keep_last_n)
        .cloned()
        .collect();
    tail.reverse();
    trim_leading_calls(&mut tail);
    tail
}

/// Splices the handoff tail of `previous` into `dest`.
///
/// Items whose ids already exist in `dest` are skipped, and the carried
/// block is re-trimmed after deduplication so it still never begins with a
/// function-call item. Returns the number of items appended.
pub fn carry_over(dest: &mut ChatContext, previous: &[ChatItem]) -> usize {
    let mut carried: Vec<ChatItem> = truncate_items(previous, TruncateOptions::handoff())
        .into_iter()
        .filter(|item| !dest.contains_id(item.id()))
        .collect();
    trim_leading_calls(&mut carried);
    dest.extend_dedup(carried)
}

fn trim_leading_calls(items: &mut Vec<ChatItem>) {
    let dangling = items
        .iter()
        .take_while(|item| item.is_function_call())
        .count();
    items.drain(..dangling);
}

#[cfg(test)]
mod tests {
    use super::*;
    use carecall_types::ChatRole;

    fn system(text: &str) -> ChatItem {
        ChatItem::message(ChatRole::System, text)
    }

    fn user(text: &str) -> ChatItem {
        ChatItem::message(ChatRole::User, text)
    }

    fn assistant(text: &str) -> ChatItem {
        ChatItem::message(ChatRole::Assistant, text)
    }

    fn call(id: &str) -> ChatItem {
        ChatItem::function_call(id, "verify_identity", r#"{"name":"Ben"}"#)
    }

    fn output(id: &str) -> ChatItem {
        ChatItem::function_call_output(id, "", false)
    }

    fn texts(items: &[ChatItem]) -> Vec<String> {
        items
            .iter()
            .map(|i| match i {
                ChatItem::Message { content, .. } => content.clone(),
                ChatItem::FunctionCall { .. } => "<call>".to_string(),
                ChatItem::FunctionCallOutput { .. } => "<output>".to_string(),
            })
            .collect()
    }

    #[test]
    fn keeps_last_six_without_system_messages() {
        let mut items = vec![system("You are the IntakeAgent.")];
        for i in 0..8 {
            items.push(user(&format!("u{i}")));
        }
        let tail = truncate_items(&items, TruncateOptions::default());
        assert_eq!(texts(&tail), vec!["u2", "u3", "u4", "u5", "u6", "u7"]);
    }

    #[test]
    fn default_options_drop_function_calls() {
        let items = vec![user("hi"), call("c1"), output("c1"), assistant("ok")];
        let tail = truncate_items(&items, TruncateOptions::default());
        assert_eq!(texts(&tail), vec!["hi", "ok"]);
    }

    #[test]
    fn handoff_keeps_calls_but_trims_dangling_prefix() {
        let items = vec![
            user("old"),
            call("c0"),
            output("c0"),
            user("My name is Ben"),
            call("c1"),
            output("c1"),
            assistant("Confirmed."),
        ];
        // The six-item window opens on the c0 call and its output.
        let tail = truncate_items(&items, TruncateOptions::handoff());
        assert_eq!(
            texts(&tail),
            vec!["My name is Ben", "<call>", "<output>", "Confirmed."]
        );
    }

    #[test]
    fn system_messages_can_be_kept() {
        let items = vec![system("s"), user("u")];
        let options = TruncateOptions {
            keep_system_message: true,
            ..TruncateOptions::default()
        };
        assert_eq!(texts(&truncate_items(&items, options)), vec!["s", "u"]);
    }

    #[test]
    fn carry_over_skips_existing_ids() {
        let shared = user("I'm Ben");
        let previous = vec![shared.clone(), assistant("Confirmed.")];
        let mut dest = ChatContext::from(vec![shared.clone()]);

        let added = carry_over(&mut dest, &previous);
        assert_eq!(added, 1);
        assert_eq!(texts(dest.items()), vec!["I'm Ben", "Confirmed."]);

        // A second carryover of the same items adds nothing.
        assert_eq!(carry_over(&mut dest, &previous), 0);
        assert_eq!(dest.len(), 2);
    }

    #[test]
    fn carry_over_retrims_after_dedup() {
        let known = user("hello");
        let previous = vec![known.clone(), call("c1"), output("c1"), assistant("bye")];
        let mut dest = ChatContext::from(vec![known]);

        carry_over(&mut dest, &previous);
        assert_eq!(texts(dest.items()), vec!["hello", "bye"]);
    }

    /// Every sequence of up to six items drawn from all four item shapes.
    fn all_sequences() -> Vec<Vec<ChatItem>> {
        let shapes: [fn(usize) -> ChatItem; 5] = [
            |i| system(&format!("s{i}")),
            |i| user(&format!("u{i}")),
            |i| assistant(&format!("a{i}")),
            |i| call(&format!("c{i}")),
            |i| output(&format!("c{i}")),
        ];
        let mut out = vec![Vec::new()];
        for len in 1..=6usize {
            let total = shapes.len().pow(len as u32);
            for mut code in 0..total {
                let mut seq = Vec::with_capacity(len);
                for pos in 0..len {
                    seq.push(shapes[code % shapes.len()](pos));
                    code /= shapes.len();
                }
                out.push(seq);
            }
        }
        out
    }

    #[test]
    fn truncation_invariants_hold_for_all_small_inputs() {
        for items in all_sequences() {
            for options in [TruncateOptions::default(), TruncateOptions::handoff()] {
                let tail = truncate_items(&items, options);
                assert!(tail.len() <= CARRYOVER_LIMIT);
                assert!(
                    tail.first().map_or(true, |i| !i.is_function_call()),
                    "tail starts with a function call: {:?}",
                    texts(&tail)
                );
                assert!(tail.iter().all(|i| !i.is_system_message()));
            }

            // Carrying over into a context that already holds half the
            // items never duplicates an id.
            let mut dest = ChatContext::from(items[..items.len() / 2].to_vec());
            let before = dest.len();
            let added = carry_over(&mut dest, &items);
            assert!(added <= CARRYOVER_LIMIT);
            assert!(dest.items()[before..]
                .first()
                .map_or(true, |i| !i.is_function_call()));
            let mut ids: Vec<&str> = dest.items().iter().map(|i| i.id()).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), dest.len());
        }
    }
}
