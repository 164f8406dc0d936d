use crate::domains::intent::LocationTable;

/// "a, b, c, or d"
fn options(locations: &LocationTable) -> String {
    let names: Vec<&str> = locations.names().collect();
    match names.split_last() {
        None => String::new(),
        Some((last, [])) => last.to_string(),
        Some((last, rest)) => format!("{}, or {}", rest.join(", "), last),
    }
}

pub fn opening_prompt(locations: &LocationTable) -> String {
    format!(
        "You are going to be in a simulated environment where you can make decisions and interact with other people. \
         Keep your responses short and to the point. Respond with a location by placing the location at the end of the sentence. \
         Decide where to meet for tea: {}. Both must agree to proceed. \
         Once you agree, end with 'final choice [location]'.",
        options(locations)
    )
}

pub fn counter_prompt(responder: &str, proposer: &str, proposal: &str) -> String {
    format!(
        "You are {}. {} said:\n\n'{}'. \
         Do you agree, or suggest a different location? Confirm with 'Location: [your choice]'.",
        responder, proposer, proposal
    )
}

pub fn arbiter_prompt(first: (&str, &str), second: (&str, &str)) -> String {
    let (first_name, first_reply) = first;
    let (second_name, second_reply) = second;
    format!(
        "Based on this conversation:\n\n{}: {}\n{}: {}\n\n\
         Do {} and {} agree on a location? If yes, extract the agreed location and respond with 'final choice [location]'. \
         If no, respond with 'no agreement'.",
        first_name, first_reply, second_name, second_reply, first_name, second_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::intent::LocationPreset;

    #[test]
    fn prompts_embed_prior_replies() {
        let opening = opening_prompt(&LocationPreset::Tea.table());
        assert!(opening.contains("park, gym, cafe, or home"));

        let counter = counter_prompt("Bob", "Alice", "Let's go to the cafe");
        assert!(counter.contains("'Let's go to the cafe'"));

        let arbiter = arbiter_prompt(("Alice", "cafe?"), ("Bob", "sure, cafe"));
        assert!(arbiter.contains("Alice: cafe?\nBob: sure, cafe"));
    }
}
