//! CSS-subset selector engine.
//!
//! Supported: type selectors, `*`, `#id`, `.class`, `[attr]`, `[attr=value]`,
//! descendant (whitespace) and child (`>`) combinators, and comma lists.

use super::Element;

/// A selector that failed to parse.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid selector `{selector}`: {reason}")]
pub struct SelectorError {
    pub selector: String,
    pub reason: String,
}

/// A parsed selector list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

/// Compound selectors joined by combinators, stored right-most first.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Complex {
    subject: Compound,
    ancestors: Vec<(Combinator, Compound)>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl Selector {
    pub fn parse(text: &str) -> Result<Selector, SelectorError> {
        let error = |reason: &str| SelectorError {
            selector: text.to_string(),
            reason: reason.to_string(),
        };
        let mut alternatives = Vec::new();
        for part in text.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(error("empty selector"));
            }
            alternatives.push(parse_complex(part).map_err(error)?);
        }
        Ok(Selector { alternatives })
    }

    pub fn matches(&self, element: &Element) -> bool {
        self.alternatives.iter().any(|c| c.matches(element))
    }

    /// Descendants of `scope` matching this selector, in document order.
    pub fn query_all(&self, scope: &Element) -> Vec<Element> {
        scope
            .descendants()
            .into_iter()
            .filter(|el| self.matches(el))
            .collect()
    }
}

impl Complex {
    fn matches(&self, element: &Element) -> bool {
        self.subject.matches(element) && match_ancestors(&self.ancestors, element)
    }
}

fn match_ancestors(rest: &[(Combinator, Compound)], element: &Element) -> bool {
    let Some(((combinator, compound), rest)) = rest.split_first() else {
        return true;
    };
    match combinator {
        Combinator::Child => element
            .parent()
            .is_some_and(|p| compound.matches(&p) && match_ancestors(rest, &p)),
        Combinator::Descendant => {
            let mut current = element.parent();
            while let Some(ancestor) = current {
                if compound.matches(&ancestor) && match_ancestors(rest, &ancestor) {
                    return true;
                }
                current = ancestor.parent();
            }
            false
        }
    }
}

impl Compound {
    fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if !element.tag_name().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.id().as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| element.has_class(c))
            && self
                .attributes
                .iter()
                .all(|(name, expected)| match (element.get_attribute(name), expected) {
                    (Some(_), None) => true,
                    (Some(actual), Some(expected)) => actual == *expected,
                    (None, _) => false,
                })
    }

    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attributes.is_empty()
    }
}

fn parse_complex(text: &str) -> Result<Complex, &'static str> {
    let mut compounds = Vec::new();
    let mut pending = None;
    let mut chars = text.chars().peekable();
    loop {
        let mut saw_space = false;
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
            saw_space = true;
        }
        let Some(&c) = chars.peek() else { break };
        if c == '>' {
            chars.next();
            if compounds.is_empty() || pending.is_some() {
                return Err("misplaced `>`");
            }
            pending = Some(Combinator::Child);
            continue;
        }
        let compound = parse_compound(&mut chars)?;
        if !compounds.is_empty() {
            let combinator = match pending.take() {
                Some(combinator) => combinator,
                None if saw_space => Combinator::Descendant,
                None => return Err("unexpected character"),
            };
            compounds.push((combinator, compound));
        } else {
            compounds.push((Combinator::Descendant, compound));
        }
    }
    if pending.is_some() {
        return Err("dangling combinator");
    }

    // Store right-most first; each compound keeps the combinator that joins it
    // to the one on its left.
    let mut iter = compounds.into_iter().rev();
    let Some((mut link, subject)) = iter.next() else {
        return Err("empty selector");
    };
    let mut ancestors = Vec::new();
    for (next_link, compound) in iter {
        ancestors.push((link, compound));
        link = next_link;
    }
    Ok(Complex { subject, ancestors })
}

fn parse_compound(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<Compound, &'static str> {
    let mut compound = Compound::default();
    let mut universal = false;
    while let Some(&c) = chars.peek() {
        match c {
            '*' => {
                chars.next();
                universal = true;
            }
            '#' => {
                chars.next();
                compound.id = Some(read_name(chars).ok_or("expected a name after `#`")?);
            }
            '.' => {
                chars.next();
                compound
                    .classes
                    .push(read_name(chars).ok_or("expected a name after `.`")?);
            }
            '[' => {
                chars.next();
                compound.attributes.push(parse_attribute(chars)?);
            }
            c if is_name_char(c) => {
                if compound.tag.is_some() || !compound.is_empty() {
                    return Err("type selector must come first");
                }
                compound.tag = read_name(chars);
            }
            c if c.is_whitespace() || c == '>' => break,
            _ => return Err("unexpected character"),
        }
    }
    if compound.is_empty() && !universal {
        return Err("expected a selector");
    }
    Ok(compound)
}

fn parse_attribute(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<(String, Option<String>), &'static str> {
    let name = read_name(chars).ok_or("expected an attribute name")?;
    match chars.next() {
        Some(']') => Ok((name, None)),
        Some('=') => {
            let value = match chars.peek() {
                Some(&quote @ ('"' | '\'')) => {
                    chars.next();
                    let mut value = String::new();
                    loop {
                        match chars.next() {
                            Some(c) if c == quote => break,
                            Some(c) => value.push(c),
                            None => return Err("unterminated attribute value"),
                        }
                    }
                    value
                }
                _ => read_name(chars).ok_or("expected an attribute value")?,
            };
            if chars.next() == Some(']') {
                Ok((name, Some(value)))
            } else {
                Err("expected `]`")
            }
        }
        _ => Err("expected `]` or `=`"),
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn read_name(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<String> {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if !is_name_char(c) {
            break;
        }
        name.push(c);
        chars.next();
    }
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests;
