use crate::error::{Error, Result};
use crate::index::Index;
use crate::store::OrderedStore;
use crate::{keys, setops, DocId};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, trace};

/// How per-code posting sets are merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Combinator {
    /// Every term must match.
    #[default]
    Intersection,
    /// Any term may match.
    Union,
}

impl FromStr for Combinator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "and" | "intersect" | "intersection" => Ok(Combinator::Intersection),
            "or" | "union" => Ok(Combinator::Union),
            other => Err(Error::Configuration(format!("unknown combinator {other:?}"))),
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combinator::Intersection => f.write_str("intersection"),
            Combinator::Union => f.write_str("union"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Query {
    index: Index,
    text: String,
    combinator: Combinator,
}

impl Query {
    pub(crate) fn new(index: Index, text: String) -> Self {
        Self { index, text, combinator: Combinator::default() }
    }

    pub fn with_combinator(mut self, combinator: Combinator) -> Self {
        self.combinator = combinator;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    /// Run the query and return matching ids in ascending order.
    ///
    /// Each phonetic code is scanned on its own blocking task. The first
    /// failing scan aborts the rest and its error is returned. Scans do not
    /// share a snapshot of the store.
    pub async fn execute(&self) -> Result<Vec<DocId>> {
        let codes = self.index.analyzer.analyze(&self.text);
        if codes.is_empty() {
            debug!(query = %self.text, "query reduced to no codes");
            return Ok(Vec::new());
        }

        let mut scans = JoinSet::new();
        for code in &codes {
            let store = Arc::clone(&self.index.store);
            let prefix = keys::word_prefix(&self.index.namespace, code);
            scans.spawn_blocking(move || scan_postings(store.as_ref(), &prefix));
        }

        let mut postings = Vec::with_capacity(codes.len());
        while let Some(joined) = scans.join_next().await {
            let scanned = joined.map_err(Error::from).and_then(|r| r);
            match scanned {
                Ok(ids) => postings.push(ids),
                Err(e) => {
                    scans.abort_all();
                    return Err(e);
                }
            }
        }

        let ids = match self.combinator {
            Combinator::Intersection => setops::intersection(&postings),
            Combinator::Union => setops::union(&postings),
        };
        debug!(
            namespace = %self.index.namespace,
            query = %self.text,
            combinator = %self.combinator,
            codes = codes.len(),
            hits = ids.len(),
            "query"
        );
        Ok(ids.into_iter().collect())
    }
}

/// Ids of every forward entry under `prefix`.
fn scan_postings(store: &dyn OrderedStore, prefix: &[u8]) -> Result<BTreeSet<DocId>> {
    let end = keys::prefix_end(prefix);
    let mut ids = BTreeSet::new();
    for entry in store.range_scan(prefix, &end)? {
        let (key, value) = entry?;
        let id = keys::decode_id(&value).ok_or(Error::Corrupt { key })?;
        ids.insert(id);
    }
    trace!(postings = ids.len(), "scanned code");
    Ok(ids)
}
