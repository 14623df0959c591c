// Letterfall – A word game
// Copyright (C) 2023, 2024  Neil Roberts
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

// The trie is stored as a flat list of nodes. Each node links to its
// first child and to its next sibling so that the children of a node
// form a chain that can be walked to find a letter. Index 0 is the
// root, which can never be a child, so an offset of zero means “none”.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResult {
    NoMatch,
    PrefixOnly,
    ExactWord,
}

#[derive(Debug, Clone)]
struct Node {
    letter: char,
    first_child: usize,
    next_sibling: usize,
    is_end: bool,
}

impl Node {
    fn new(letter: char) -> Node {
        Node {
            letter,
            first_child: 0,
            next_sibling: 0,
            is_end: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dictionary {
    nodes: Vec<Node>,
    n_words: usize,
}

#[derive(Clone, Copy)]
pub struct Walker<'a> {
    nodes: &'a [Node],
    node: usize,
}

impl<'a> Walker<'a> {
    pub fn new(dictionary: &'a Dictionary) -> Walker<'a> {
        Walker {
            nodes: &dictionary.nodes,
            node: 0,
        }
    }

    // Picks up a walk at a node returned by node(). This lets a search
    // keep its position without holding on to a borrow.
    pub fn resume(dictionary: &'a Dictionary, node: usize) -> Walker<'a> {
        Walker {
            nodes: &dictionary.nodes,
            node,
        }
    }

    pub fn node(&self) -> usize {
        self.node
    }

    pub fn is_end(&self) -> bool {
        self.nodes[self.node].is_end
    }

    pub fn step(&self, next: char) -> Option<Walker<'a>> {
        find_child(self.nodes, self.node, next).map(|node| {
            Walker { nodes: self.nodes, node }
        })
    }
}

fn find_child(nodes: &[Node], parent: usize, letter: char) -> Option<usize> {
    let mut child = nodes[parent].first_child;

    while child != 0 {
        let node = &nodes[child];

        if node.letter == letter {
            return Some(child);
        }

        child = node.next_sibling;
    }

    None
}

impl Dictionary {
    pub fn new() -> Dictionary {
        Dictionary {
            nodes: vec![Node::new('\0')],
            n_words: 0,
        }
    }

    pub fn insert(&mut self, word: &str) {
        let mut node = 0;

        for letter in word.chars() {
            node = match find_child(&self.nodes, node, letter) {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    let mut new_node = Node::new(letter);
                    new_node.next_sibling = self.nodes[node].first_child;
                    self.nodes[node].first_child = child;
                    self.nodes.push(new_node);
                    child
                },
            };
        }

        if !std::mem::replace(&mut self.nodes[node].is_end, true) {
            self.n_words += 1;
        }
    }

    pub fn search(&self, s: &str) -> SearchResult {
        let mut walker = Walker::new(self);

        for letter in s.chars() {
            walker = match walker.step(letter) {
                Some(w) => w,
                None => return SearchResult::NoMatch,
            };
        }

        if walker.is_end() {
            SearchResult::ExactWord
        } else if walker.node == 0 && self.n_words == 0 {
            SearchResult::NoMatch
        } else {
            SearchResult::PrefixOnly
        }
    }

    pub fn len(&self) -> usize {
        self.n_words
    }

    pub fn is_empty(&self) -> bool {
        self.n_words == 0
    }
}

impl Default for Dictionary {
    fn default() -> Dictionary {
        Dictionary::new()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Dictionary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Dictionary {
        let mut dictionary = Dictionary::new();

        for word in iter {
            dictionary.insert(word.as_ref());
        }

        dictionary
    }
}
