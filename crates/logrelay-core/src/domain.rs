use std::fmt;

/// Group chat id (the container of one or more channels/topics).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GroupId(pub i64);

/// Sub-channel inside a group (e.g. a forum topic).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChannelId(pub i64);

/// Individual chat participant. Sessions report their own identity with this type too.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RecipientId(pub i64);

/// A fully addressed group destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroupTarget {
    pub group: GroupId,
    pub channel: ChannelId,
}

/// One delivery path, used to label diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Group(GroupTarget),
    Direct(RecipientId),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Group(t) => write!(f, "group {}/{}", t.group.0, t.channel.0),
            Route::Direct(r) => write!(f, "direct {}", r.0),
        }
    }
}
