//! Typed query layer over parsed HTML
//!
//! Listing and detail pages are queried by class names, tag names and
//! attribute patterns. `Document` and `Element` expose exactly those lookups
//! on top of `scraper`, so extraction code never builds CSS by hand.

use scraper::{ElementRef, Html, Selector};

/// A parsed HTML page
pub struct Document {
    html: Html,
}

/// A single element borrowed from a [`Document`]
#[derive(Clone, Copy)]
pub struct Element<'a> {
    inner: ElementRef<'a>,
}

impl Document {
    /// Parses a full HTML document
    ///
    /// Parsing is lenient: malformed markup yields a best-effort tree,
    /// never an error.
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// The `<html>` element
    pub fn root(&self) -> Element<'_> {
        Element {
            inner: self.html.root_element(),
        }
    }

    /// First element carrying all of the whitespace-separated `class_names`
    pub fn find_first_by_class(&self, class_names: &str) -> Option<Element<'_>> {
        self.root().find_first_by_class(class_names)
    }

    /// First element with the given tag name
    pub fn find_first_by_tag(&self, tag: &str) -> Option<Element<'_>> {
        self.root().find_first_by_tag_within(tag)
    }

    /// First `tag` element whose class attribute contains `pattern`
    pub fn find_first_by_class_pattern(&self, tag: &str, pattern: &str) -> Option<Element<'_>> {
        self.root().find_first_by_class_pattern(tag, pattern)
    }

    /// First `tag` element without a (non-empty) class attribute
    pub fn find_first_unclassed(&self, tag: &str) -> Option<Element<'_>> {
        self.root().find_first_unclassed(tag)
    }

    /// First element whose `attr` equals `value` exactly
    pub fn find_first_by_attribute_value(&self, attr: &str, value: &str) -> Option<Element<'_>> {
        self.root().find_first_by_attribute_value(attr, value)
    }

    /// All elements whose `attr` contains `needle` and which also carry a
    /// non-empty `required` attribute, in document order
    pub fn find_all_by_attribute_pattern(
        &self,
        attr: &str,
        needle: &str,
        required: &str,
    ) -> Vec<Element<'_>> {
        self.root().find_all_by_attribute_pattern(attr, needle, required)
    }
}

impl<'a> Element<'a> {
    /// First descendant carrying all of the whitespace-separated `class_names`
    pub fn find_first_by_class(&self, class_names: &str) -> Option<Element<'a>> {
        let css: String = class_names
            .split_whitespace()
            .map(|class| format!(".{}", class))
            .collect();
        if css.is_empty() {
            return None;
        }
        self.select_first(&css)
    }

    /// First descendant with the given tag name
    pub fn find_first_by_tag_within(&self, tag: &str) -> Option<Element<'a>> {
        self.select_first(tag)
    }

    /// All descendants with the given tag name, in document order
    pub fn find_all_by_tag_within(&self, tag: &str) -> Vec<Element<'a>> {
        self.select_all(tag)
    }

    /// First `tag` descendant whose class attribute contains `pattern`
    pub fn find_first_by_class_pattern(&self, tag: &str, pattern: &str) -> Option<Element<'a>> {
        self.select_all(&format!("{}[class]", tag))
            .into_iter()
            .find(|element| {
                element
                    .attr("class")
                    .is_some_and(|class| class.contains(pattern))
            })
    }

    /// First `tag` descendant without a (non-empty) class attribute
    pub fn find_first_unclassed(&self, tag: &str) -> Option<Element<'a>> {
        self.select_all(tag).into_iter().find(|element| {
            element
                .attr("class")
                .map_or(true, |class| class.trim().is_empty())
        })
    }

    /// First descendant whose `attr` equals `value` exactly
    pub fn find_first_by_attribute_value(&self, attr: &str, value: &str) -> Option<Element<'a>> {
        self.select_all(&format!("[{}]", attr))
            .into_iter()
            .find(|element| element.attr(attr) == Some(value))
    }

    /// All descendants whose `attr` contains `needle` and which carry a
    /// non-empty `required` attribute, in document order
    pub fn find_all_by_attribute_pattern(
        &self,
        attr: &str,
        needle: &str,
        required: &str,
    ) -> Vec<Element<'a>> {
        self.select_all(&format!("[{}][{}]", attr, required))
            .into_iter()
            .filter(|element| {
                element.attr(attr).is_some_and(|value| value.contains(needle))
                    && element
                        .attr(required)
                        .is_some_and(|value| !value.trim().is_empty())
            })
            .collect()
    }

    /// Value of an attribute, if present
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.inner.value().attr(name)
    }

    /// Class tokens in source order
    pub fn class_tokens(&self) -> Vec<&'a str> {
        self.attr("class")
            .map(|class| class.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Concatenated text of the element and its descendants
    pub fn text(&self) -> String {
        self.inner.text().collect()
    }

    fn select_first(&self, css: &str) -> Option<Element<'a>> {
        let selector = Selector::parse(css).ok()?;
        self.inner
            .select(&selector)
            .next()
            .map(|inner| Element { inner })
    }

    fn select_all(&self, css: &str) -> Vec<Element<'a>> {
        match Selector::parse(css) {
            Ok(selector) => self
                .inner
                .select(&selector)
                .map(|inner| Element { inner })
                .collect(),
            Err(_) => {
                tracing::trace!("Unusable selector: {}", css);
                Vec::new()
            }
        }
    }
}
