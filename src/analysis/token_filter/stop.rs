//! Stop filter implementation.
//!
//! Drops tokens whose lowercase form is in a stop word list. The default list
//! is a broad English list; it is deliberately aggressive, so words such as
//! "hello", "second" or "new" are dropped from TEXT fields too.
//!
//! # Examples
//!
//! ```
//! use bitsearch::analysis::stage::Stage;
//! use bitsearch::analysis::token_filter::StopFilter;
//! use bitsearch::analysis::token::Token;
//!
//! let filter = StopFilter::new();
//! assert_eq!(filter.process(Token::new("The", 0)).unwrap().count(), 0);
//! assert_eq!(filter.process(Token::new("thief", 0)).unwrap().count(), 1);
//! ```

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use crate::analysis::stage::{self, Stage};
use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// Default English stop words list.
const DEFAULT_ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "able", "about", "above", "abroad", "according", "accordingly", "across", "actually",
    "adj", "after", "afterwards", "again", "against", "ago", "ahead", "aint", "all", "allow",
    "allows", "almost", "alone", "along", "alongside", "already", "also", "although", "always",
    "am", "amid", "amidst", "among", "amongst", "an", "and", "another", "any", "anybody", "anyhow",
    "anyone", "anything", "anyway", "anyways", "anywhere", "apart", "appear", "appreciate",
    "appropriate", "are", "arent", "around", "as", "aside", "ask", "asking", "associated", "at",
    "available", "away", "awfully", "b", "back", "backward", "backwards", "be", "became",
    "because", "become", "becomes", "becoming", "been", "before", "beforehand", "begin", "behind",
    "being", "believe", "below", "beside", "besides", "best", "better", "between", "beyond",
    "both", "brief", "but", "by", "c", "came", "can", "cannot", "cant", "caption", "cause",
    "causes", "certain", "certainly", "changes", "clearly", "cmon", "co", "co.", "com", "come",
    "comes", "concerning", "consequently", "consider", "considering", "contain", "containing",
    "contains", "corresponding", "could", "couldnt", "course", "cs", "currently", "d", "dare",
    "darent", "definitely", "described", "despite", "did", "didnt", "different", "directly", "do",
    "does", "doesnt", "doing", "done", "dont", "down", "downwards", "during", "e", "each", "edu",
    "eg", "eight", "eighty", "either", "else", "elsewhere", "end", "ending", "enough", "entirely",
    "especially", "et", "etc", "even", "ever", "evermore", "every", "everybody", "everyone",
    "everything", "everywhere", "ex", "exactly", "example", "except", "f", "fairly", "far",
    "farther", "few", "fewer", "fifth", "first", "five", "followed", "following", "follows", "for",
    "forever", "former", "formerly", "forth", "forward", "found", "four", "from", "further",
    "furthermore", "g", "get", "gets", "getting", "given", "gives", "go", "goes", "going", "gone",
    "got", "gotten", "greetings", "h", "had", "hadnt", "half", "happens", "hardly", "has", "hasnt",
    "have", "havent", "having", "he", "hed", "hell", "hello", "help", "hence", "her", "here",
    "hereafter", "hereby", "herein", "heres", "hereupon", "hers", "herself", "hes", "hi", "him",
    "himself", "his", "hither", "hopefully", "how", "howbeit", "however", "hundred", "i", "id",
    "ie", "if", "ignored", "ill", "im", "immediate", "in", "inasmuch", "inc", "inc.", "indeed",
    "indicate", "indicated", "indicates", "inner", "inside", "insofar", "instead", "into",
    "inward", "is", "isnt", "it", "itd", "itll", "its", "itself", "ive", "j", "just", "k", "keep",
    "keeps", "kept", "know", "known", "knows", "l", "last", "lately", "later", "latter",
    "latterly", "least", "less", "lest", "let", "lets", "like", "liked", "likely", "likewise",
    "little", "look", "looking", "looks", "low", "lower", "ltd", "m", "made", "mainly", "make",
    "makes", "many", "may", "maybe", "maynt", "me", "mean", "meantime", "meanwhile", "merely",
    "might", "mightnt", "mine", "minus", "miss", "more", "moreover", "most", "mostly", "mr", "mrs",
    "much", "must", "mustnt", "my", "myself", "n", "name", "namely", "nd", "near", "nearly",
    "necessary", "need", "neednt", "needs", "neither", "never", "neverf", "neverless",
    "nevertheless", "new", "next", "nine", "ninety", "no", "nobody", "non", "none", "nonetheless",
    "noone", "no-one", "nor", "normally", "not", "nothing", "notwithstanding", "novel", "now",
    "nowhere", "o", "obviously", "of", "off", "often", "oh", "ok", "okay", "old", "on", "once",
    "one", "ones", "only", "onto", "opposite", "or", "other", "others", "otherwise", "ought",
    "oughtnt", "our", "ours", "ourselves", "out", "outside", "over", "overall", "own", "p",
    "particular", "particularly", "past", "per", "perhaps", "placed", "please", "plus", "possible",
    "presumably", "probably", "provided", "provides", "q", "que", "quite", "qv", "r", "rather",
    "rd", "re", "really", "reasonably", "recent", "recently", "regarding", "regardless", "regards",
    "relatively", "respectively", "right", "round", "s", "said", "same", "saw", "say", "saying",
    "says", "second", "secondly", "see", "seeing", "seem", "seemed", "seeming", "seems", "seen",
    "self", "selves", "sensible", "sent", "serious", "seriously", "seven", "several", "shall",
    "shant", "she", "shed", "shell", "shes", "should", "shouldnt", "since", "six", "so", "some",
    "somebody", "someday", "somehow", "someone", "something", "sometime", "sometimes", "somewhat",
    "somewhere", "soon", "sorry", "specified", "specify", "specifying", "still", "sub", "such",
    "sup", "sure", "t", "take", "taken", "taking", "tell", "tends", "th", "than", "thank",
    "thanks", "thanx", "that", "thatll", "thats", "thatve", "the", "their", "theirs", "them",
    "themselves", "then", "thence", "there", "thereafter", "thereby", "thered", "therefore",
    "therein", "therell", "therere", "theres", "thereupon", "thereve", "these", "they", "theyd",
    "theyll", "theyre", "theyve", "thing", "things", "think", "third", "thirty", "this",
    "thorough", "thoroughly", "those", "though", "three", "through", "throughout", "thru", "thus",
    "till", "to", "together", "too", "took", "toward", "towards", "tried", "tries", "truly", "try",
    "trying", "ts", "twice", "two", "u", "un", "under", "underneath", "undoing", "unfortunately",
    "unless", "unlike", "unlikely", "until", "unto", "up", "upon", "upwards", "us", "use", "used",
    "useful", "uses", "using", "usually", "v", "value", "various", "versus", "very", "via", "viz",
    "vs", "w", "want", "wants", "was", "wasnt", "way", "we", "wed", "welcome", "well", "went",
    "were", "werent", "weve", "what", "whatever", "whatll", "whats", "whatve", "when", "whence",
    "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "wheres", "whereupon",
    "wherever", "whether", "which", "whichever", "while", "whilst", "whither", "who", "whod",
    "whoever", "whole", "wholl", "whom", "whomever", "whos", "whose", "why", "will", "willing",
    "wish", "with", "within", "without", "wonder", "wont", "would", "wouldnt", "x", "y", "yes",
    "yet", "you", "youd", "youll", "your", "youre", "yours", "yourself", "yourselves", "youve",
    "z", "zero",
];

/// Default English stop words as a HashSet.
pub static DEFAULT_ENGLISH_STOP_WORDS_SET: LazyLock<Arc<HashSet<String>>> = LazyLock::new(|| {
    Arc::new(
        DEFAULT_ENGLISH_STOP_WORDS
            .iter()
            .map(|&s| s.to_string())
            .collect(),
    )
});

/// A filter that removes stop words from the token stream.
#[derive(Clone, Debug)]
pub struct StopFilter {
    stop_words: Arc<HashSet<String>>,
}

impl StopFilter {
    /// Create a new stop filter with the default English stop words.
    pub fn new() -> Self {
        StopFilter {
            stop_words: Arc::clone(&DEFAULT_ENGLISH_STOP_WORDS_SET),
        }
    }

    /// Create a stop filter from a custom list. Words are stored lowercased.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        StopFilter {
            stop_words: Arc::new(
                words
                    .into_iter()
                    .map(|w| w.as_ref().to_lowercase())
                    .collect(),
            ),
        }
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for StopFilter {
    fn process(&self, token: Token) -> Result<TokenStream> {
        if self.is_stop_word(&token.text) {
            stage::none()
        } else {
            stage::one(token)
        }
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}
