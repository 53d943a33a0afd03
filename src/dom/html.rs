//! Host document backed by a parsed kuchiki tree.
//!
//! The isolation boundary is a declarative shadow root: a
//! `<template shadowrootmode="open">` whose nodes live in the template's content
//! fragment rather than in the document tree. Selectors run against the host
//! document never reach them, and a browser parsing the serialized page turns
//! the template into a real shadow root on the container.

use super::{DomError, HostDocument};
use crate::widget::CONTAINER_BOT_ATTR;
use kuchiki::NodeRef;
use kuchiki::traits::*;
use std::collections::HashMap;

const SHADOW_MODE_ATTR: &str = "shadowrootmode";

#[derive(Clone)]
pub struct HtmlDocument {
    root: NodeRef,
}

/// Declarative shadow root attached to a container.
#[derive(Clone)]
pub struct ShadowBoundary {
    root: NodeRef,
}

impl ShadowBoundary {
    /// Content fragment the widget renders into.
    pub fn root(&self) -> &NodeRef {
        &self.root
    }
}

impl HtmlDocument {
    pub fn parse(html: &str) -> Self {
        Self {
            root: kuchiki::parse_html().one(html.to_string()),
        }
    }

    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    pub fn body(&self) -> Result<NodeRef, DomError> {
        self.root
            .select_first("body")
            .map(|body| body.as_node().clone())
            .map_err(|_| DomError::MissingBody)
    }

    /// Serialize the page, writing each shadow root's content as the inner html
    /// of its `<template>`.
    ///
    /// The content nodes are lent to their template for the duration of the
    /// serialization and handed back afterwards, so the live tree keeps them out
    /// of reach of host selectors.
    pub fn to_html(&self) -> String {
        let boundaries: Vec<(NodeRef, NodeRef)> = match self
            .root
            .select(&format!("template[{SHADOW_MODE_ATTR}]"))
        {
            Ok(templates) => templates
                .filter_map(|template| {
                    let contents = template.template_contents.clone()?;
                    Some((template.as_node().clone(), contents))
                })
                .collect(),
            Err(()) => Vec::new(),
        };

        for (template, contents) in &boundaries {
            move_children(contents, template);
        }
        let html = self.root.to_string();
        for (template, contents) in &boundaries {
            move_children(template, contents);
        }
        html
    }
}

impl HostDocument for HtmlDocument {
    type Container = NodeRef;
    type Boundary = ShadowBoundary;

    fn create_container(&self, id: &str, bot_id: &str) -> Result<NodeRef, DomError> {
        let body = self.body()?;
        let container = detached_element("<div></div>", "div")?;
        set_attribute(&container, "id", id);
        set_attribute(&container, CONTAINER_BOT_ATTR, bot_id);
        body.append(container.clone());
        Ok(container)
    }

    fn attach_boundary(&self, container: &NodeRef) -> Result<ShadowBoundary, DomError> {
        let attached = container.children().any(|child| {
            child.as_element().is_some_and(|el| {
                &*el.name.local == "template" && el.attributes.borrow().contains(SHADOW_MODE_ATTR)
            })
        });
        if attached {
            return Err(DomError::BoundaryExists);
        }

        let template = detached_element("<template shadowrootmode=\"open\"></template>", "template")?;
        let root = template
            .as_element()
            .and_then(|el| el.template_contents.clone())
            .ok_or_else(|| DomError::Unsupported("template has no content fragment".into()))?;
        container.append(template);
        Ok(ShadowBoundary { root })
    }

    fn inject_style(&self, boundary: &ShadowBoundary, css: &str) -> Result<(), DomError> {
        let style = detached_element("<style></style>", "style")?;
        style.append(NodeRef::new_text(css));
        boundary.root.append(style);
        Ok(())
    }

    fn remove_container(&self, container: &NodeRef) {
        if container.parent().is_some() {
            container.detach();
        }
    }

    fn marked_script(&self, marker: &str) -> Option<HashMap<String, String>> {
        let script = self
            .root
            .select_first(&format!("script[{marker}]"))
            .ok()?;
        let attributes = script.attributes.borrow();
        Some(
            attributes
                .map
                .iter()
                .map(|(name, attr)| (name.local.to_string(), attr.value.clone()))
                .collect(),
        )
    }
}

/// Build a standalone element by parsing `markup` in a scratch document, the same
/// way fragment html is parsed before being grafted into a page.
pub(crate) fn detached_element(markup: &str, selector: &str) -> Result<NodeRef, DomError> {
    let scratch = kuchiki::parse_html().one(format!("<html><body>{markup}</body></html>"));
    let node = scratch
        .select_first(selector)
        .map_err(|_| DomError::Operation(format!("failed to build element {selector}")))?
        .as_node()
        .clone();
    node.detach();
    Ok(node)
}

fn move_children(from: &NodeRef, to: &NodeRef) {
    let children: Vec<NodeRef> = from.children().collect();
    for child in children {
        to.append(child);
    }
}

pub(crate) fn set_attribute(node: &NodeRef, name: &str, value: &str) {
    if let Some(el) = node.as_element() {
        el.attributes.borrow_mut().insert(name, value.to_string());
    }
}
